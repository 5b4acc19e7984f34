use birthlog_core::error::Result;
use birthlog_core::{Database, ValidationError};
use clap::Subcommand;

use super::print_json;

#[derive(Subcommand)]
pub enum DataAction {
    /// Delete every birth and the streak record
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> Result<()> {
    match action {
        DataAction::Reset { yes } => {
            if !yes {
                return Err(ValidationError::InvalidValue {
                    field: "yes".to_string(),
                    message: "data reset deletes everything; pass --yes to confirm".to_string(),
                }
                .into());
            }
            let summary = Database::open()?.reset_all()?;
            print_json(&summary)?;
        }
    }
    Ok(())
}
