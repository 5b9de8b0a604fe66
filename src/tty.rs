use std::io::IsTerminal;

use crate::cli::ColorMode;

/// Check if stderr is connected to a TTY
pub fn is_stderr_tty() -> bool {
    std::io::stderr().is_terminal()
}

/// Decide whether diagnostics on stderr get ANSI colours
pub fn should_use_colors_with_mode(color_mode: ColorMode) -> bool {
    colors_for(
        color_mode,
        is_stderr_tty(),
        std::env::var_os("NO_COLOR").is_some(),
        std::env::var_os("FORCE_COLOR").is_some(),
    )
}

fn colors_for(mode: ColorMode, tty: bool, no_color: bool, force_color: bool) -> bool {
    match mode {
        ColorMode::Never => false,
        // Even with Always, respect NO_COLOR (https://no-color.org/)
        ColorMode::Always => !no_color,
        ColorMode::Auto => {
            if no_color {
                false
            } else if force_color {
                true
            } else {
                tty
            }
        }
    }
}
