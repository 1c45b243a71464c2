//! `flexgen handlers`: list the registered handlers.

use crate::output::StyledOutput;
use flexgen_engine::HandlerRegistry;
use termcolor::ColorChoice;

pub fn execute(color: ColorChoice) {
    let registry = HandlerRegistry::with_builtin_handlers();
    let mut out = StyledOutput::new(color);

    let entries = registry.entries();
    let width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, description) in entries {
        out.bold(&format!("{:<width$}", name, width = width));
        if !description.is_empty() {
            out.plain("  ");
            out.plain(description);
        }
        out.newline();
    }
    out.flush();
}
