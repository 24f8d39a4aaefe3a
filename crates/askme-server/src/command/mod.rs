//! Administrative subcommands of the server binary

pub mod generate_data;
pub mod superuser;

pub use generate_data::{GenerateCounts, GenerateReport, generate_data};
pub use superuser::create_superuser;
