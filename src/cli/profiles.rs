//! Profiles subcommand implementation.
//!
//! Handles the `hostcollide profiles` command for managing scan profiles.

use crate::config::{Profile, ProfileManager};
use crate::error::{CliResult, ProfileError};
use crate::output;
use clap::{Parser, Subcommand};

/// Manage scan profiles.
#[derive(Parser, Debug)]
pub struct ProfilesCommand {
    #[command(subcommand)]
    pub action: ProfilesAction,
}

/// Profile management actions.
#[derive(Subcommand, Debug)]
pub enum ProfilesAction {
    /// List all available profiles
    List,

    /// Show details of a specific profile
    Show {
        /// Profile name
        name: String,
    },

    /// Create a new profile
    Create {
        /// Profile name
        name: String,

        /// Ports to probe
        #[arg(short, long, default_value = "80,443")]
        ports: String,

        /// Concurrency level
        #[arg(short, long, default_value = "50")]
        concurrency: usize,

        /// Request timeout in milliseconds
        #[arg(short, long, default_value = "10000")]
        timeout: u64,

        /// Rate limit (requests per second)
        #[arg(short, long, default_value = "0")]
        rate_limit: u32,

        /// Profile description
        #[arg(short = 'd', long)]
        description: Option<String>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,

        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

impl ProfilesCommand {
    /// Execute the profiles command.
    pub fn execute(&self, quiet: bool) -> CliResult<()> {
        let mut manager = ProfileManager::new()?;

        match &self.action {
            ProfilesAction::List => list_profiles(&manager, quiet),
            ProfilesAction::Show { name } => show_profile(&manager, name),
            ProfilesAction::Create {
                name,
                ports,
                concurrency,
                timeout,
                rate_limit,
                description,
            } => {
                let profile = Profile {
                    name: name.clone(),
                    description: description.clone().unwrap_or_default(),
                    ports: ports.clone(),
                    concurrency: *concurrency,
                    timeout_ms: *timeout,
                    rate_limit: *rate_limit,
                };
                manager.create(profile)?;

                if !quiet {
                    output::print_success(&format!("Profile '{}' created successfully", name));
                }
                Ok(())
            }
            ProfilesAction::Delete { name, yes } => delete_profile(&mut manager, name, *yes, quiet),
        }
    }
}

fn list_profiles(manager: &ProfileManager, quiet: bool) -> CliResult<()> {
    let profiles = manager.list();

    if !quiet {
        println!(
            "\n{:<15} {:<8} {:<24} {}",
            "NAME", "CONC", "PORTS", "DESCRIPTION"
        );
        println!("{}", "-".repeat(70));
    }

    for profile in profiles {
        println!(
            "{:<15} {:<8} {:<24} {}",
            profile.name,
            profile.concurrency,
            clip(&profile.ports, 22),
            clip(&profile.description, 30)
        );
    }

    if !quiet {
        println!();
    }

    Ok(())
}

fn show_profile(manager: &ProfileManager, name: &str) -> CliResult<()> {
    let profile = manager
        .get(name)
        .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;

    println!("\nProfile: {}", profile.name);
    println!("{}", "=".repeat(40));
    println!("Description:  {}", profile.description);
    println!("Ports:        {}", profile.ports);
    println!("Concurrency:  {}", profile.concurrency);
    println!("Timeout:      {} ms", profile.timeout_ms);
    println!(
        "Rate Limit:   {}",
        if profile.rate_limit == 0 {
            "unlimited".to_string()
        } else {
            format!("{} req/s", profile.rate_limit)
        }
    );
    println!(
        "Built-in:     {}",
        if Profile::is_builtin(&profile.name) { "yes" } else { "no" }
    );
    println!();

    Ok(())
}

fn delete_profile(manager: &mut ProfileManager, name: &str, yes: bool, quiet: bool) -> CliResult<()> {
    if manager.get(name).is_none() {
        return Err(ProfileError::NotFound(name.to_string()).into());
    }

    if !yes {
        println!("Delete profile '{}'? [y/N] ", name);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    manager.delete(name)?;

    if !quiet {
        output::print_success(&format!("Profile '{}' deleted", name));
    }

    Ok(())
}

/// Shorten a cell to `max` characters.
fn clip(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}
