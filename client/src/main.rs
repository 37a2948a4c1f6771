//! Crop Advisor command line client
//!
//! Registers fields, fetches ranked crop recommendations and diagnoses leaf
//! images against the advisory backend.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crop_advisor_client::external::load_leaf_image;
use crop_advisor_client::render::{
    render_diagnosis, render_error, render_field, render_recommendations,
};
use crop_advisor_client::{ApiClient, ClientError, Config, RecommendationRetriever, Workflow};
use shared::{CropRecommendation, FieldForm, FieldId, Preferences};

#[derive(Parser)]
#[command(name = "crop-advisor")]
#[command(about = "Field registration, crop recommendations and leaf disease diagnosis")]
#[command(version)]
struct Cli {
    /// Backend base URL, overriding configuration
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or inspect fields
    Field {
        #[command(subcommand)]
        command: FieldCommand,
    },
    /// Fetch ranked crop recommendations for a field
    Recommend {
        field_id: String,
        /// Preference override as key=value; repeatable
        #[arg(long = "pref", value_parser = parse_preference)]
        preferences: Vec<(String, Value)>,
    },
    /// Diagnose a leaf image
    Diagnose { image: PathBuf },
}

#[derive(Subcommand)]
enum FieldCommand {
    /// Register a new field
    Create {
        #[command(flatten)]
        form: FieldArgs,
        /// Fetch recommendations for the new field
        #[arg(long, default_value_t = false)]
        recommend: bool,
    },
    /// Show a field by id
    Show { id: String },
}

#[derive(Args, Clone)]
struct FieldArgs {
    #[arg(long, allow_hyphen_values = true)]
    latitude: String,
    #[arg(long, allow_hyphen_values = true)]
    longitude: String,
    /// Hectares
    #[arg(long)]
    area: String,
    #[arg(long, default_value = "")]
    soil_ph: String,
    #[arg(long, default_value = "")]
    soil_n: String,
    #[arg(long, default_value = "")]
    soil_p: String,
    #[arg(long, default_value = "")]
    soil_k: String,
    #[arg(long, default_value = "")]
    last_crop: String,
    #[arg(long, default_value_t = false)]
    irrigation: bool,
}

impl From<FieldArgs> for FieldForm {
    fn from(args: FieldArgs) -> Self {
        FieldForm {
            latitude: args.latitude,
            longitude: args.longitude,
            area: args.area,
            soil_ph: args.soil_ph,
            soil_n: args.soil_n,
            soil_p: args.soil_p,
            soil_k: args.soil_k,
            last_crop: args.last_crop,
            irrigation_available: args.irrigation,
        }
    }
}

/// `key=value`; the value is read as JSON when it parses, else as a string
fn parse_preference(input: &str) -> Result<(String, Value), String> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", input))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("preference key must not be empty".to_string());
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing; stdout is reserved for results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "crop_advisor=info,crop_advisor_client=info,reqwest=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(base_url) = cli.base_url.clone() {
        config = config.with_base_url(base_url);
    }

    tracing::debug!(
        environment = %config.environment,
        base_url = %config.api.base_url,
        "Configuration loaded"
    );

    let api = ApiClient::new(&config.api)?;
    match run(&cli, &config, api).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // Operation failures are reported to the grower; anything else is a bug
        Err(e) => match e.downcast_ref::<ClientError>() {
            Some(error) => {
                if cli.json {
                    print_json(&error.to_response())?;
                } else {
                    eprintln!("{}", render_error(error));
                }
                Ok(ExitCode::FAILURE)
            }
            None => Err(e),
        },
    }
}

async fn run(cli: &Cli, config: &Config, api: ApiClient) -> anyhow::Result<()> {
    let symbol = config.display.currency_symbol.as_str();

    match &cli.command {
        Commands::Field {
            command: FieldCommand::Create { form, recommend },
        } => {
            let mut workflow = Workflow::with_form(api, FieldForm::from(form.clone()));

            if *recommend {
                let Some((field, recommendations)) = workflow.submit_field_and_recommend().await?
                else {
                    return Ok(());
                };
                if cli.json {
                    print_json(&serde_json::json!({
                        "field": field,
                        "recommendations": recommendations,
                    }))?;
                } else {
                    println!("{}\n", render_field(&field));
                    println!("{}", render_recommendations(&recommendations, symbol));
                }
            } else if let Some(field) = workflow.submit_field().await? {
                emit(cli.json, &field, render_field)?;
            }
        }
        Commands::Field {
            command: FieldCommand::Show { id },
        } => {
            let field = api.get_field(&FieldId::new(id.as_str())).await?;
            emit(cli.json, &field, render_field)?;
        }
        Commands::Recommend {
            field_id,
            preferences,
        } => {
            let mut retriever = RecommendationRetriever::new();
            if !preferences.is_empty() {
                let preferences: Preferences = preferences.iter().cloned().collect();
                retriever.set_preferences(Some(preferences));
            }

            let recommendations = retriever
                .display(&api, FieldId::new(field_id.as_str()))
                .await?
                .to_vec();
            emit(cli.json, &recommendations, |recs: &Vec<CropRecommendation>| {
                render_recommendations(recs, symbol)
            })?;
        }
        Commands::Diagnose { image } => {
            let image = load_leaf_image(image).await?;
            let mut workflow = Workflow::new(api);
            let diagnosis = workflow.diagnose(image).await?;
            emit(cli.json, &diagnosis, render_diagnosis)?;
        }
    }

    Ok(())
}

fn emit<T: Serialize>(json: bool, value: &T, render: impl Fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        print_json(value)
    } else {
        println!("{}", render(value));
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", encode_json(value)?);
    Ok(())
}

fn encode_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("Failed to encode output")
}
