use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;
use photo_catalog::api::PhotoApi;
use photo_catalog::api_clients::http::HttpPhotoApi;
use photo_catalog::config::AppConfig;
use photo_catalog::controller::PhotoListController;
use photo_catalog::dialogs::{CreatePhotoDialog, DeletePhotoDialog, EditPhotoDialog, ViewPhotoDialog};
use photo_catalog::error::AppError;
use photo_catalog::render;
use photo_catalog::validation::{ImageUpload, PhotoForm};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "photo-catalog", version, about = "Browse and manage the photo catalog")]
struct Cli {
    /// Overrides `api_base_url` from the configuration files
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one page of photos
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        brand: Option<String>,
    },
    /// Show every field of one photo
    View { id: u64 },
    /// Upload a new photo
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        file: PathBuf,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Change an existing photo; omitted fields keep their current value
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a photo
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct FieldArgs {
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    brand: Option<String>,
    #[arg(long)]
    gear: Option<String>,
    #[arg(long)]
    location: Option<String>,
    /// Date taken, YYYY-MM-DD
    #[arg(long)]
    taken: Option<String>,
}

impl FieldArgs {
    fn apply_to(self, form: &mut PhotoForm) {
        let fields = [
            (self.description, &mut form.description),
            (self.category, &mut form.photo_category),
            (self.brand, &mut form.camera_brand),
            (self.gear, &mut form.gear_used),
            (self.location, &mut form.location),
            (self.taken, &mut form.photo_taken),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

fn print_failure(error: &AppError) {
    match error {
        AppError::Validation(errors) => {
            for field_error in errors.errors() {
                eprintln!("{}: {}", field_error.field, field_error.message);
            }
        }
        other => eprintln!("Error: {}", other.user_message()),
    }
}

fn confirm(prompt: &str) -> std::io::Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

async fn run(command: Command, config: &AppConfig) -> Result<(), AppError> {
    let api: Arc<dyn PhotoApi> = Arc::new(HttpPhotoApi::new(config)?);
    let controller = PhotoListController::new(api.clone(), config);

    match command {
        Command::List {
            page,
            search,
            category,
            brand,
        } => {
            controller.search(&search).await?;
            let pagination = controller.snapshot().pagination;
            if !pagination.contains(page) {
                return Err(AppError::NotFound(format!(
                    "page {} (last page is {})",
                    page, pagination.last_page
                )));
            }
            controller.go_to_page(page).await?;
            controller.set_category(category);
            controller.set_camera_brand(brand);
            print!("{}", render::photo_page(&controller.snapshot(), config));
        }
        Command::View { id } => {
            let photo = api.fetch_photo(id).await?;
            print!("{}", render::view_dialog(&ViewPhotoDialog::new(photo, config)));
        }
        Command::Create {
            title,
            file,
            fields,
        } => {
            let mut dialog = CreatePhotoDialog::new(config);
            dialog.form.title = title;
            dialog.form.image = Some(ImageUpload::from_path(&file).await?);
            fields.apply_to(&mut dialog.form);

            let photo = dialog.submit(&controller).await?;
            println!("Created photo {} \"{}\"", photo.id.unwrap_or_default(), photo.title);
        }
        Command::Edit {
            id,
            title,
            file,
            fields,
        } => {
            let photo = api.fetch_photo(id).await?;
            let mut dialog = EditPhotoDialog::new(photo, config);
            if let Some(title) = title {
                dialog.form.title = title;
            }
            if let Some(file) = file {
                dialog.form.image = Some(ImageUpload::from_path(&file).await?);
            }
            fields.apply_to(&mut dialog.form);

            let photo = dialog.submit(&controller).await?;
            println!("Updated photo {} \"{}\"", id, photo.title);
        }
        Command::Delete { id, yes } => {
            let photo = api.fetch_photo(id).await?;
            let mut dialog = DeletePhotoDialog::new(photo);
            if !yes && !confirm(&dialog.prompt())? {
                println!("Cancelled");
                return Ok(());
            }
            dialog.confirm(&controller).await?;
            println!("Deleted photo {}", id);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::new()?;
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    // Initialize env_logger based on config.log_level
    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    info!("Starting photo-catalog against {}", config.api_base_url);

    if let Err(e) = run(cli.command, &config).await {
        log::error!("Command failed: {}", e);
        print_failure(&e);
        std::process::exit(1);
    }

    Ok(())
}
