//! Command execution against the persisted session.
//!
//! Each invocation loads the state file, applies one command and, when the
//! command changed anything, writes the state back. Output text is
//! returned rather than printed so it can be asserted on.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shuffly_engine::{Category, GroupSettings, ShuffleError, ShuffleSession};
use tracing::{info, warn};

use crate::cli::{member_separator, Commands, DisplayArgs, RosterArgs};
use crate::config::ShufflyConfig;
use crate::store::StateFile;

/// Run `command` and return the text to print
pub fn run(command: &Commands, config: &ShufflyConfig) -> Result<String> {
    let state = StateFile::load(&config.state_path, config)?;
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = state.into_session(rng);

    let (output, changed) = execute(command, &mut session)?;

    if changed {
        StateFile::from_session(&session)?.save(&config.state_path)?;
    }
    Ok(output)
}

/// Apply one command to `session`; the flag says whether to save
pub fn execute(command: &Commands, session: &mut ShuffleSession) -> Result<(String, bool)> {
    match command {
        Commands::Groups {
            roster,
            count,
            labels,
            fixed,
            roles,
            display,
        } => {
            apply_roster(session, roster)?;
            let mut settings = session.settings().clone();
            update_settings(&mut settings, *count, labels, fixed, roles);
            session.set_settings(settings);
            apply_display(session, display);

            let outcome = session.assign_groups().map_err(user_error)?;
            info!(
                round = outcome.round,
                groups = outcome.assignment.groups.len(),
                "Groups assigned"
            );
            Ok((
                format!(
                    "{}\n\n{}",
                    session.groups_text(),
                    session.round_hint(Category::Groups)
                ),
                true,
            ))
        }

        Commands::Order {
            roster,
            fixed,
            clear_fixed,
        } => {
            apply_roster(session, roster)?;
            let mut pins = if *clear_fixed {
                Vec::new()
            } else {
                session.fixed_order().to_vec()
            };
            pins.extend(fixed.iter().cloned());
            session.set_fixed_order(pins);

            let outcome = session.assign_order().map_err(user_error)?;
            for warning in &outcome.warnings {
                warn!(code = warning.code(), "{}", warning);
            }
            Ok((session.order_text().to_string(), true))
        }

        Commands::Roles { roster, roles } => {
            apply_roster(session, roster)?;
            if !roles.is_empty() {
                session.set_roles(roles.clone());
            }
            session.assign_roles().map_err(user_error)?;
            Ok((session.roles_text().to_string(), true))
        }

        Commands::Back { category } => navigate(session, (*category).into(), true),
        Commands::Forward { category } => navigate(session, (*category).into(), false),

        Commands::Show { category, raw } => {
            let text = match category.map(Category::from) {
                Some(Category::Groups) => session.groups_text().to_string(),
                Some(Category::Order) => session.order_text().to_string(),
                Some(Category::Roles) => session.roles_text().to_string(),
                None => {
                    let roster = if *raw {
                        session.roster_text()
                    } else {
                        session.display_text()
                    };
                    format!(
                        "{}\n{}\n\n{}",
                        session.member_count_text(),
                        session.size_hint_text(),
                        roster
                    )
                }
            };
            Ok((text, false))
        }

        Commands::Stats => Ok((session.stats_text().to_string(), false)),

        Commands::Clear => {
            session.clear_history();
            Ok(("History cleared".to_string(), true))
        }

        Commands::Sample => {
            let names = session.load_sample_roster();
            Ok((names, true))
        }

        Commands::Export { output } => {
            let text = session.export_text();
            match output {
                Some(path) => {
                    std::fs::write(path, &text)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    Ok((format!("Exported to {}", path.display()), false))
                }
                None => Ok((text, false)),
            }
        }
    }
}

fn navigate(
    session: &mut ShuffleSession,
    category: Category,
    back: bool,
) -> Result<(String, bool)> {
    let moved = if back {
        session.back(category)
    } else {
        session.forward(category)
    };
    if !moved {
        bail!(
            "No {} round to go {} to ({})",
            category,
            if back { "back" } else { "forward" },
            session.round_hint(category)
        );
    }
    let view = match category {
        Category::Groups => session.groups_text(),
        Category::Order => session.order_text(),
        Category::Roles => session.roles_text(),
    };
    Ok((format!("{}\n\n{}", view, session.round_hint(category)), true))
}

/// Replace the roster when the command names one
fn apply_roster(session: &mut ShuffleSession, args: &RosterArgs) -> Result<()> {
    if let Some(names) = &args.names {
        session.set_roster_text(&names.join("\n"));
        return Ok(());
    }
    let Some(path) = &args.roster else {
        return Ok(());
    };
    let text = read_roster(path)?;
    if args.display_text {
        session.set_display_text(&text);
    } else {
        session.set_roster_text(&text);
    }
    Ok(())
}

fn read_roster(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read roster from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster {}", path.display()))
}

fn update_settings(
    settings: &mut GroupSettings,
    count: Option<usize>,
    labels: &Option<Vec<String>>,
    fixed: &Option<Vec<String>>,
    roles: &Option<Vec<String>>,
) {
    if let Some(count) = count {
        settings.group_count = count;
    }
    if let Some(labels) = labels {
        settings.custom_labels = labels.clone();
    }
    if let Some(fixed) = fixed {
        settings.fixed_members = fixed.clone();
    }
    if let Some(roles) = roles {
        settings.roles = roles.clone();
    }
}

fn apply_display(session: &mut ShuffleSession, args: &DisplayArgs) {
    let mut options = session.display_options().clone();
    if let Some(format) = args.format {
        options.format = format.into();
    }
    if let Some(sep) = &args.member_sep {
        options.member_separator = member_separator(sep);
    }
    if let Some(sep) = args.group_sep {
        options.group_separator = sep.into();
    }
    session.set_display_options(options);
}

fn user_error(e: ShuffleError) -> anyhow::Error {
    anyhow::anyhow!("{} [{}]", e, e.code())
}
