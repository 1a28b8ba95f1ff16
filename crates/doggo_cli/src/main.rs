//! `doggo` admin CLI.
//!
//! Loads the settings file, builds the repositories from it, runs one CRUD
//! operation, and prints the result as JSON on stdout.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use doggo_core::{
    init_logging_from_config, AppConfig, Dog, DogId, DogRepository, Neighborhood, NeighborhoodId,
    NeighborhoodRepository, Owner, OwnerId, OwnerRepository, SqliteDogRepository,
    SqliteNeighborhoodRepository, SqliteOwnerRepository,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "doggo", version, about = "Manage DogGo owners, dogs and neighborhoods")]
struct Cli {
    /// JSON settings file with `ConnectionStrings.DefaultConnection`
    #[arg(long, short = 'c', env = "DOGGO_CONFIG", default_value = "appsettings.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Owner operations
    #[command(subcommand)]
    Owners(OwnerCommand),
    /// Dog operations
    #[command(subcommand)]
    Dogs(DogCommand),
    /// Neighborhood operations
    #[command(subcommand)]
    Neighborhoods(NeighborhoodCommand),
}

#[derive(Subcommand, Debug)]
enum OwnerCommand {
    /// List all owners (dogs not included)
    List,
    /// Show one owner with their dogs
    Show { id: OwnerId },
    /// Find one owner by exact email
    FindByEmail { email: String },
    /// Create an owner and print it with its new id
    Add(OwnerFields),
    /// Replace every column of an existing owner
    Update {
        id: OwnerId,
        #[command(flatten)]
        fields: OwnerFields,
    },
    /// Delete an owner (fails while they still have dogs)
    Delete { id: OwnerId },
}

#[derive(Args, Debug)]
struct OwnerFields {
    #[arg(long)]
    email: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    neighborhood_id: NeighborhoodId,
}

#[derive(Subcommand, Debug)]
enum DogCommand {
    /// List dogs, optionally for one owner
    List {
        #[arg(long)]
        owner_id: Option<OwnerId>,
    },
    Show { id: DogId },
    Add(DogFields),
    Update {
        id: DogId,
        #[command(flatten)]
        fields: DogFields,
    },
    Delete { id: DogId },
}

#[derive(Args, Debug)]
struct DogFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    breed: String,
    #[arg(long)]
    owner_id: OwnerId,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum NeighborhoodCommand {
    List,
    Show { id: NeighborhoodId },
    Add {
        #[arg(long)]
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("failed to load settings from {}", cli.config.display()))?
        .with_env_overrides();

    if config
        .logging
        .as_ref()
        .is_some_and(|logging| logging.directory.is_some())
    {
        init_logging_from_config(&config)
            .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;
    }

    match cli.command {
        Commands::Owners(command) => run_owner_command(&config, command),
        Commands::Dogs(command) => run_dog_command(&config, command),
        Commands::Neighborhoods(command) => run_neighborhood_command(&config, command),
    }
}

fn run_owner_command(config: &AppConfig, command: OwnerCommand) -> Result<()> {
    let repo = SqliteOwnerRepository::new(config).context("failed to build owner repository")?;

    match command {
        OwnerCommand::List => print_json(&repo.get_all_owners()?),
        OwnerCommand::Show { id } => match repo.get_owner_by_id(id)? {
            Some(owner) => print_json(&owner),
            None => bail!("owner {id} not found"),
        },
        OwnerCommand::FindByEmail { email } => match repo.get_owner_by_email(&email)? {
            Some(owner) => print_json(&owner),
            None => bail!("no owner with email `{email}`"),
        },
        OwnerCommand::Add(fields) => {
            let mut owner = fields.into_owner();
            repo.add_owner(&mut owner).context("failed to add owner")?;
            print_json(&owner)
        }
        OwnerCommand::Update { id, fields } => {
            let mut owner = fields.into_owner();
            owner.id = id;
            repo.update_owner(&owner)
                .with_context(|| format!("failed to update owner {id}"))?;
            print_json(&owner)
        }
        OwnerCommand::Delete { id } => {
            repo.delete_owner(id)
                .with_context(|| format!("failed to delete owner {id}"))?;
            Ok(())
        }
    }
}

fn run_dog_command(config: &AppConfig, command: DogCommand) -> Result<()> {
    let repo = SqliteDogRepository::new(config).context("failed to build dog repository")?;

    match command {
        DogCommand::List { owner_id: None } => print_json(&repo.get_all_dogs()?),
        DogCommand::List {
            owner_id: Some(owner_id),
        } => print_json(&repo.get_dogs_by_owner_id(owner_id)?),
        DogCommand::Show { id } => match repo.get_dog_by_id(id)? {
            Some(dog) => print_json(&dog),
            None => bail!("dog {id} not found"),
        },
        DogCommand::Add(fields) => {
            let mut dog = fields.into_dog();
            repo.add_dog(&mut dog).context("failed to add dog")?;
            print_json(&dog)
        }
        DogCommand::Update { id, fields } => {
            let mut dog = fields.into_dog();
            dog.id = id;
            repo.update_dog(&dog)
                .with_context(|| format!("failed to update dog {id}"))?;
            print_json(&dog)
        }
        DogCommand::Delete { id } => {
            repo.delete_dog(id)
                .with_context(|| format!("failed to delete dog {id}"))?;
            Ok(())
        }
    }
}

fn run_neighborhood_command(config: &AppConfig, command: NeighborhoodCommand) -> Result<()> {
    let repo = SqliteNeighborhoodRepository::new(config)
        .context("failed to build neighborhood repository")?;

    match command {
        NeighborhoodCommand::List => print_json(&repo.get_all_neighborhoods()?),
        NeighborhoodCommand::Show { id } => match repo.get_neighborhood_by_id(id)? {
            Some(neighborhood) => print_json(&neighborhood),
            None => bail!("neighborhood {id} not found"),
        },
        NeighborhoodCommand::Add { name } => {
            let mut neighborhood = Neighborhood::new(name);
            repo.add_neighborhood(&mut neighborhood)
                .context("failed to add neighborhood")?;
            print_json(&neighborhood)
        }
    }
}

impl OwnerFields {
    fn into_owner(self) -> Owner {
        Owner::new(
            self.email,
            self.name,
            self.address,
            self.neighborhood_id,
            self.phone,
        )
    }
}

impl DogFields {
    fn into_dog(self) -> Dog {
        let mut dog = Dog::new(self.name, self.breed, self.owner_id);
        dog.notes = self.notes;
        dog.image_url = self.image_url;
        dog
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, OwnerCommand};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_owner_update_with_flattened_fields() {
        let cli = Cli::try_parse_from([
            "doggo",
            "--config",
            "/etc/doggo/appsettings.json",
            "owners",
            "update",
            "7",
            "--email",
            "ada@example.com",
            "--name",
            "Ada",
            "--address",
            "1 Engine Row",
            "--phone",
            "555",
            "--neighborhood-id",
            "2",
        ])
        .unwrap();

        match cli.command {
            Commands::Owners(OwnerCommand::Update { id, fields }) => {
                assert_eq!(id, 7);
                assert_eq!(fields.into_owner().neighborhood_id, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
