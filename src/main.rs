//! Binary entry point: parse arguments and dispatch to command handlers.
//!
//! Every command is a one-shot synchronous operation; the process exits as
//! soon as the handler returns. Errors are rendered through the logger and
//! mapped to a non-zero exit code.

use brightctl::args::{CliAction, ParsedArgs};
use brightctl::commands;
use brightctl::{log_end, log_error, log_pipe};

fn main() {
    let parsed = ParsedArgs::parse(std::env::args().skip(1));
    std::process::exit(run(parsed.action));
}

fn run(action: CliAction) -> i32 {
    let result = match action {
        CliAction::Get {
            debug_enabled,
            monitor,
        } => commands::get::handle_get_command(monitor.as_deref(), debug_enabled),
        CliAction::Set {
            debug_enabled,
            monitor,
            value,
        } => commands::set::handle_set_command(value, monitor.as_deref(), debug_enabled),
        CliAction::Step {
            debug_enabled,
            monitor,
            direction,
            step,
        } => commands::set::handle_step_command(direction, step, monitor.as_deref(), debug_enabled),
        CliAction::List {
            debug_enabled,
            json,
        } => commands::list::handle_list_command(json, debug_enabled),
        CliAction::Detect { debug_enabled } => commands::detect::handle_detect_command(debug_enabled),
        CliAction::ShowHelp => {
            commands::help::display_help();
            Ok(())
        }
        CliAction::ShowVersion => {
            commands::help::display_version();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            commands::help::display_help();
            return 1;
        }
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            log_pipe!();
            log_error!("{e:#}");
            log_end!();
            1
        }
    }
}
