use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use inquire::Text;
use log::{error, info};

use crate::models::image::ImageInput;
use crate::service::openai_service::VisionClient;
use crate::service::pipeline::{PipelineContext, PipelineOutput};

pub const DEFAULT_OUTPUT: &str = "wochenplan.ics";

#[derive(Parser)]
#[command(about = "Turns a photo of a weekly schedule into an iCalendar file")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Send an image to the vision model and write the calendar.
    Convert {
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Build the calendar from a saved model answer, without a network call.
    Render {
        #[arg(long)]
        transcription: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub async fn cli(pipeline: Arc<PipelineContext>, vision: Option<Arc<dyn VisionClient>>) {
    // Fine to exit here on bad arguments
    let cli = Cli::parse();
    match run_command(cli.command, &pipeline, vision.as_deref()).await {
        Ok((path, output)) => println!(
            "Wrote {} event(s) to {}",
            output.event_count,
            path.display()
        ),
        Err(e) => {
            error!("{}", e);
            println!("Failed to build calendar: {}", e);
        }
    }
}

pub async fn run_command(
    command: Commands,
    pipeline: &PipelineContext,
    vision: Option<&dyn VisionClient>,
) -> Result<(PathBuf, PipelineOutput), Box<dyn std::error::Error>> {
    match command {
        Commands::Convert { image, output } => {
            let Some(vision) = vision else {
                return Err("OPENAI_API_KEY is required for convert".into());
            };
            let image_path = match image {
                Some(path) => path,
                None => specify_image_path()?,
            };
            let bytes = tokio::fs::read(&image_path).await?;
            let filename = image_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let input = ImageInput::detect(bytes, None, &filename);
            let result = pipeline.process_image(vision, &input).await?;
            write_calendar(output, result).await
        }
        Commands::Render {
            transcription,
            output,
        } => {
            let text = tokio::fs::read_to_string(&transcription).await?;
            let result = pipeline.convert_transcription(&text)?;
            write_calendar(output, result).await
        }
    }
}

async fn write_calendar(
    output: Option<PathBuf>,
    result: PipelineOutput,
) -> Result<(PathBuf, PipelineOutput), Box<dyn std::error::Error>> {
    let path = output.unwrap_or_else(|| Path::new(DEFAULT_OUTPUT).to_path_buf());
    tokio::fs::write(&path, &result.calendar).await?;
    info!("Wrote calendar to {}", path.display());
    Ok((path, result))
}

fn specify_image_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let answer = Text::new("Pfad zum Foto des Wochenplans:").prompt()?;
    Ok(PathBuf::from(answer.trim()))
}
