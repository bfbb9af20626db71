use clap::Subcommand;

use super::config::ConfigArgs;
use super::extract::ExtractArgs;
use super::plan::PlanArgs;
use super::probe::ProbeArgs;
use super::session::SessionArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Attach to the dashboard and run the approval session
    Session(SessionArgs),

    /// Print and validate the seller replacement plan
    Plan(PlanArgs),

    /// Extract a seller record from a saved response body
    Extract(ExtractArgs),

    /// Fetch a URL through the network observer
    Probe(ProbeArgs),

    /// Manage configuration
    Config(ConfigArgs),
}
