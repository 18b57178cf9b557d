use once_cell::sync::OnceCell;

static REGISTERED: OnceCell<()> = OnceCell::new();

/// Installs the shared theme once per process. Returns `false` when it was
/// already installed, so re-opening screens never re-applies it.
pub fn register(ctx: &egui::Context) -> bool {
    let mut installed = false;
    REGISTERED.get_or_init(|| {
        catppuccin_egui::set_theme(ctx, catppuccin_egui::LATTE);
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(8.0, 8.0);
            style.spacing.button_padding = egui::vec2(10.0, 4.0);
        });
        installed = true;
    });
    installed
}
