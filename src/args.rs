//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. It supports the standard help,
//! version, and debug flags while gracefully handling unknown options.

/// Direction for a relative brightness change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Print the current brightness for the selected monitor
    Get {
        debug_enabled: bool,
        monitor: Option<String>,
    },
    /// Set an absolute brightness value
    Set {
        debug_enabled: bool,
        monitor: Option<String>,
        value: i32,
    },
    /// Step brightness up or down relative to the current value
    Step {
        debug_enabled: bool,
        monitor: Option<String>,
        direction: StepDirection,
        step: Option<u8>,
    },
    /// List detected monitors
    List { debug_enabled: bool, json: bool },
    /// Force a fresh detection pass, replacing the cache
    Detect { debug_enabled: bool },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit non-zero
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments, without the program
    ///   name (typically `std::env::args().skip(1)`)
    ///
    /// # Returns
    /// ParsedArgs containing the determined action
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut json = false;
        let mut monitor: Option<String> = None;
        let mut positionals: Vec<String> = Vec::new();

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            let arg = arg.as_ref();
            match arg {
                "-h" | "--help" => {
                    return Self {
                        action: CliAction::ShowHelp,
                    };
                }
                "-V" | "--version" => {
                    return Self {
                        action: CliAction::ShowVersion,
                    };
                }
                "-d" | "--debug" => debug_enabled = true,
                "--json" => json = true,
                "-m" | "--monitor" => match iter.next() {
                    Some(value) => monitor = Some(value.as_ref().to_string()),
                    None => {
                        log_warning!("Missing value for {arg}");
                        return Self {
                            action: CliAction::ShowHelpDueToError,
                        };
                    }
                },
                // A leading dash can also be a negative set value; only
                // reject tokens that aren't numbers
                other if other.starts_with('-') && other.parse::<i32>().is_err() => {
                    log_warning!("Unknown option: {other}");
                    return Self {
                        action: CliAction::ShowHelpDueToError,
                    };
                }
                other => positionals.push(other.to_string()),
            }
        }

        let action = Self::action_from_positionals(&positionals, debug_enabled, json, monitor);
        Self { action }
    }

    fn action_from_positionals(
        positionals: &[String],
        debug_enabled: bool,
        json: bool,
        monitor: Option<String>,
    ) -> CliAction {
        let mut parts = positionals.iter().map(String::as_str);
        let command = parts.next();
        let operand = parts.next();

        if parts.next().is_some() {
            log_warning!("Too many arguments");
            return CliAction::ShowHelpDueToError;
        }

        match (command, operand) {
            (None, _) => CliAction::ShowHelp,
            (Some("get" | "g"), None) => CliAction::Get {
                debug_enabled,
                monitor,
            },
            (Some("set" | "s"), Some(value)) => match value.parse::<i32>() {
                Ok(value) => CliAction::Set {
                    debug_enabled,
                    monitor,
                    value,
                },
                Err(_) => {
                    log_warning!("Brightness value must be a number, got '{value}'");
                    CliAction::ShowHelpDueToError
                }
            },
            (Some("set" | "s"), None) => {
                log_warning!("set requires a brightness value");
                CliAction::ShowHelpDueToError
            }
            (Some(cmd @ ("up" | "u" | "down")), step) => {
                let step = match step.map(str::parse::<u8>) {
                    None => None,
                    Some(Ok(step)) => Some(step),
                    Some(Err(_)) => {
                        log_warning!("Step must be a number between 1 and 50");
                        return CliAction::ShowHelpDueToError;
                    }
                };
                let direction = if cmd == "down" {
                    StepDirection::Down
                } else {
                    StepDirection::Up
                };
                CliAction::Step {
                    debug_enabled,
                    monitor,
                    direction,
                    step,
                }
            }
            (Some("list" | "l"), None) => CliAction::List {
                debug_enabled,
                json,
            },
            (Some("detect"), None) => CliAction::Detect { debug_enabled },
            (Some(cmd @ ("get" | "g" | "list" | "l" | "detect")), Some(stray)) => {
                log_warning!("{cmd} takes no arguments, got '{stray}'");
                CliAction::ShowHelpDueToError
            }
            (Some(unknown), _) => {
                log_warning!("Unknown command: {unknown}");
                CliAction::ShowHelpDueToError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        crate::logger::Log::set_enabled(false);
        let parsed = ParsedArgs::parse(args.iter().copied());
        crate::logger::Log::set_enabled(true);
        parsed.action
    }

    #[test]
    fn no_arguments_shows_help() {
        assert_eq!(parse(&[]), CliAction::ShowHelp);
    }

    #[test]
    fn help_and_version_flags() {
        assert_eq!(parse(&["--help"]), CliAction::ShowHelp);
        assert_eq!(parse(&["-h"]), CliAction::ShowHelp);
        assert_eq!(parse(&["--version"]), CliAction::ShowVersion);
        assert_eq!(parse(&["-V"]), CliAction::ShowVersion);
    }

    #[test]
    fn get_with_monitor_selector() {
        assert_eq!(
            parse(&["get", "-m", "2"]),
            CliAction::Get {
                debug_enabled: false,
                monitor: Some("2".to_string()),
            }
        );
    }

    #[test]
    fn set_parses_value() {
        assert_eq!(
            parse(&["set", "75"]),
            CliAction::Set {
                debug_enabled: false,
                monitor: None,
                value: 75,
            }
        );
    }

    #[test]
    fn set_passes_out_of_range_values_through() {
        // Range enforcement belongs to the controller, not the parser
        assert_eq!(
            parse(&["set", "101"]),
            CliAction::Set {
                debug_enabled: false,
                monitor: None,
                value: 101,
            }
        );
        assert_eq!(
            parse(&["set", "-1"]),
            CliAction::Set {
                debug_enabled: false,
                monitor: None,
                value: -1,
            }
        );
    }

    #[test]
    fn set_without_value_is_an_error() {
        assert_eq!(parse(&["set"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn up_and_down_with_optional_step() {
        assert_eq!(
            parse(&["up"]),
            CliAction::Step {
                debug_enabled: false,
                monitor: None,
                direction: StepDirection::Up,
                step: None,
            }
        );
        assert_eq!(
            parse(&["down", "5", "--debug"]),
            CliAction::Step {
                debug_enabled: true,
                monitor: None,
                direction: StepDirection::Down,
                step: Some(5),
            }
        );
    }

    #[test]
    fn list_with_json_flag() {
        assert_eq!(
            parse(&["list", "--json"]),
            CliAction::List {
                debug_enabled: false,
                json: true,
            }
        );
    }

    #[test]
    fn detect_command() {
        assert_eq!(
            parse(&["detect"]),
            CliAction::Detect {
                debug_enabled: false
            }
        );
    }

    #[test]
    fn unknown_command_and_option_show_help() {
        assert_eq!(parse(&["frobnicate"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["get", "--frobnicate"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["list", "5"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn missing_monitor_value_is_an_error() {
        assert_eq!(parse(&["get", "-m"]), CliAction::ShowHelpDueToError);
    }
}
