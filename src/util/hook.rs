use crate::ui::tui;

pub fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = tui::Tui::restore() {
            tracing::error!("Failed to restore terminal: {e}");
        }
        tracing::error!("{panic_info}");
        hook(panic_info);
    }));
}
