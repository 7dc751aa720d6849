use clap::{Args, Parser, Subcommand, ValueEnum};
use shuffly_engine::{Category, DisplayFormat, GroupSeparator, MemberSeparator};
use std::path::PathBuf;

/// Shuffle an event's roster into groups, a running order and roles
#[derive(Parser, Debug)]
#[command(name = "shuffly")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML config file
    #[arg(global = true, long, short = 'c')]
    pub config: Option<PathBuf>,

    /// State file (overrides SHUFFLY_STATE_PATH and the config file)
    #[arg(global = true, long)]
    pub state: Option<PathBuf>,

    /// Seed for reproducible shuffles (overrides SHUFFLY_SEED)
    #[arg(global = true, long)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Shuffle the roster into groups
    Groups {
        #[command(flatten)]
        roster: RosterArgs,

        /// Number of groups (1-26)
        #[arg(long, short = 'n')]
        count: Option<usize>,

        /// Custom group labels; their count sets the number of groups
        #[arg(long, value_delimiter = ',')]
        labels: Option<Vec<String>>,

        /// Members kept in their previous group where possible
        #[arg(long, value_delimiter = ',')]
        fixed: Option<Vec<String>>,

        /// Roles cycled through each group
        #[arg(long, value_delimiter = ',')]
        roles: Option<Vec<String>>,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Shuffle the roster into a running order
    Order {
        #[command(flatten)]
        roster: RosterArgs,

        /// Pinned position such as `2: Bob` (repeatable)
        #[arg(long = "fix", value_name = "POS: NAME")]
        fixed: Vec<String>,

        /// Drop all stored pins before shuffling
        #[arg(long)]
        clear_fixed: bool,
    },

    /// Hand out roles to random members
    Roles {
        #[command(flatten)]
        roster: RosterArgs,

        /// Roles to hand out (defaults to the stored list)
        #[arg(value_delimiter = ',')]
        roles: Vec<String>,
    },

    /// Step one round back
    Back {
        #[arg(value_enum, default_value_t = CategoryArg::Groups)]
        category: CategoryArg,
    },

    /// Step one round forward
    Forward {
        #[arg(value_enum, default_value_t = CategoryArg::Groups)]
        category: CategoryArg,
    },

    /// Show the roster or one result view
    Show {
        #[arg(value_enum)]
        category: Option<CategoryArg>,

        /// Print the raw roster with round tags
        #[arg(long)]
        raw: bool,
    },

    /// Show repeat-pairing statistics for the current group round
    Stats,

    /// Forget every round and strip the roster's tags
    Clear,

    /// Replace the roster with sample names
    Sample,

    /// Export groups, order and roles as plain text
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

/// Roster replacement shared by the shuffle commands
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct RosterArgs {
    /// Read the roster from a file (`-` for stdin)
    #[arg(long, short = 'r', value_name = "PATH")]
    pub roster: Option<PathBuf>,

    /// Comma-separated member names
    #[arg(long, value_delimiter = ',', conflicts_with = "roster")]
    pub names: Option<Vec<String>>,

    /// Treat the roster file as edited display text (`Name#round 1: Red`)
    #[arg(long, requires = "roster")]
    pub display_text: bool,
}

/// Group text rendering flags
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct DisplayArgs {
    /// Group block format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Member separator: `newline`, `tab`, `comma` or any literal text
    #[arg(long)]
    pub member_sep: Option<String>,

    /// Separator between groups
    #[arg(long, value_enum)]
    pub group_sep: Option<GroupSepArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Groups,
    Order,
    Roles,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Groups => Category::Groups,
            CategoryArg::Order => Category::Order,
            CategoryArg::Roles => Category::Roles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// `A: m1, m2`
    Name,
    /// Label on its own line
    NameBreak,
    /// `A (2): m1, m2`
    NameCount,
    /// Label and count on their own line
    NameCountBreak,
    /// Members only
    None,
}

impl From<FormatArg> for DisplayFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Name => DisplayFormat::Name,
            FormatArg::NameBreak => DisplayFormat::NameBreak,
            FormatArg::NameCount => DisplayFormat::NameCount,
            FormatArg::NameCountBreak => DisplayFormat::NameCountBreak,
            FormatArg::None => DisplayFormat::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupSepArg {
    None,
    BlankLine,
    Rule,
    Wave,
}

impl From<GroupSepArg> for GroupSeparator {
    fn from(arg: GroupSepArg) -> Self {
        match arg {
            GroupSepArg::None => GroupSeparator::None,
            GroupSepArg::BlankLine => GroupSeparator::BlankLine,
            GroupSepArg::Rule => GroupSeparator::Rule,
            GroupSepArg::Wave => GroupSeparator::Wave,
        }
    }
}

/// Parse a `--member-sep` value
pub fn member_separator(value: &str) -> MemberSeparator {
    match value {
        "newline" => MemberSeparator::Newline,
        "tab" => MemberSeparator::Tab,
        "comma" => MemberSeparator::Comma,
        other => MemberSeparator::Custom(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_flags() {
        let cli = Cli::parse_from([
            "shuffly",
            "--seed",
            "7",
            "groups",
            "--names",
            "Ann,Ben,Cid",
            "-n",
            "2",
            "--labels",
            "Red,Blue",
            "--format",
            "name-count",
        ]);
        assert_eq!(cli.seed, Some(7));
        match cli.command {
            Commands::Groups {
                roster,
                count,
                labels,
                display,
                ..
            } => {
                assert_eq!(
                    roster.names,
                    Some(vec!["Ann".to_string(), "Ben".into(), "Cid".into()])
                );
                assert_eq!(count, Some(2));
                assert_eq!(labels, Some(vec!["Red".to_string(), "Blue".into()]));
                assert_eq!(display.format, Some(FormatArg::NameCount));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_back_defaults_to_groups() {
        let cli = Cli::parse_from(["shuffly", "back"]);
        assert_eq!(
            cli.command,
            Commands::Back {
                category: CategoryArg::Groups
            }
        );
        let cli = Cli::parse_from(["shuffly", "forward", "order"]);
        assert_eq!(
            cli.command,
            Commands::Forward {
                category: CategoryArg::Order
            }
        );
    }

    #[test]
    fn test_order_pins_repeat() {
        let cli = Cli::parse_from(["shuffly", "order", "--fix", "1: Ann", "--fix", "3=Cid"]);
        match cli.command {
            Commands::Order { fixed, .. } => assert_eq!(fixed, vec!["1: Ann", "3=Cid"]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_roster_and_names_conflict() {
        let result = Cli::try_parse_from([
            "shuffly", "groups", "--roster", "a.txt", "--names", "Ann",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_member_separator_values() {
        assert_eq!(member_separator("tab"), MemberSeparator::Tab);
        assert_eq!(
            member_separator(" | "),
            MemberSeparator::Custom(" | ".into())
        );
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
