use image_gallery::{
    client::AlgorithmParams,
    error::GalleryError,
    gallery::ApplyOutcome,
    history::{HistoryBound, Step},
    types::ImageId,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::commands::{failure, print_editor_path, print_errors};
use super::Gallery;

const HELP: &str = "\
Commands:
  apply <algorithm> [key=value ...]   process the stored image
  chain <algorithm> [key=value ...]   process the image currently shown
  undo | redo                         move through the edit history
  save [name]                         store the current image as a new one
  status                              show the selection and history
  errors                              show recorded errors
  clear                               forget recorded errors
  help                                show this message
  quit                                leave the session";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Apply(AlgorithmParams),
    Chain(AlgorithmParams),
    Undo,
    Redo,
    Save(Option<String>),
    Status,
    Errors,
    Clear,
    Help,
    Quit,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(word, rest)| (word, rest.trim()))
            .unwrap_or((line, ""));
        let params = |rest: &str| {
            rest.parse::<AlgorithmParams>()
                .map_err(|e: GalleryError| e.to_string())
        };

        match word.to_lowercase().as_str() {
            "apply" | "a" => params(rest).map(Self::Apply),
            "chain" | "c" => params(rest).map(Self::Chain),
            "undo" | "u" => Ok(Self::Undo),
            "redo" | "r" => Ok(Self::Redo),
            "save" => Ok(Self::Save((!rest.is_empty()).then(|| rest.to_string()))),
            "status" | "s" => Ok(Self::Status),
            "errors" => Ok(Self::Errors),
            "clear" => Ok(Self::Clear),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{other}', try 'help'")),
        }
    }
}

pub async fn run_session(gallery: &mut Gallery, id: ImageId) -> anyhow::Result<()> {
    if gallery.refresh_list().await.is_none() || !gallery.select_image(id).await {
        return Err(failure(gallery, &format!("could not open image {id}")));
    }
    println!("{HELP}");
    print_status(gallery);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match SessionCommand::parse(&line) {
            Ok(SessionCommand::Quit) => break,
            Ok(command) => execute(gallery, command).await,
            Err(message) => eprintln!("{message}"),
        }
        if !gallery.selection().is_selected() {
            println!("Image {id} is no longer available");
            break;
        }
    }
    Ok(())
}

async fn execute(gallery: &mut Gallery, command: SessionCommand) {
    match command {
        SessionCommand::Apply(params) => apply(gallery, params, false).await,
        SessionCommand::Chain(params) => apply(gallery, params, true).await,
        SessionCommand::Undo => {
            let step = gallery.undo();
            report_step(gallery, step);
        }
        SessionCommand::Redo => {
            let step = gallery.redo();
            report_step(gallery, step);
        }
        SessionCommand::Save(name) => {
            if gallery.save_current_as(name).await {
                println!("Saved ({} images in gallery)", gallery.images().len());
            } else {
                print_errors(gallery);
            }
        }
        SessionCommand::Status => print_status(gallery),
        SessionCommand::Errors => {
            if gallery.errors().is_empty() {
                println!("No errors");
            }
            print_errors(gallery);
        }
        SessionCommand::Clear => gallery.clear_errors(),
        SessionCommand::Help => println!("{HELP}"),
        SessionCommand::Quit => {}
    }
}

async fn apply(gallery: &mut Gallery, params: AlgorithmParams, chained: bool) {
    match gallery.apply_algorithm(params, chained).await {
        ApplyOutcome::Applied => {
            print_editor_path(gallery);
            print_status(gallery);
        }
        ApplyOutcome::Failed => print_errors(gallery),
        other => println!("Not applied: {other:?}"),
    }
}

fn report_step(gallery: &Gallery, step: Step) {
    match step {
        Step::Moved(_) => print_status(gallery),
        Step::NoOp(HistoryBound::Oldest) => println!("Nothing to undo"),
        Step::NoOp(HistoryBound::Newest) => println!("Nothing to redo"),
        Step::Queued => println!("Waiting for pending edits"),
    }
}

fn print_status(gallery: &Gallery) {
    let Some(image) = gallery.selection().image() else {
        println!("No image selected");
        return;
    };
    let (position, size) = gallery
        .history()
        .and_then(|history| Some((history.cursor_index()? + 1, history.size())))
        .unwrap_or((0, 0));
    let dimensions = gallery.current_size().unwrap_or(image.size);
    println!(
        "Image {} '{}' [{dimensions}], version {position}/{size}",
        image.id, image.name
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("undo", SessionCommand::Undo)]
    #[case("  R ", SessionCommand::Redo)]
    #[case("status", SessionCommand::Status)]
    #[case("save", SessionCommand::Save(None))]
    #[case("save holiday copy", SessionCommand::Save(Some("holiday copy".to_string())))]
    #[case("exit", SessionCommand::Quit)]
    fn parses_simple_commands(#[case] line: &str, #[case] expected: SessionCommand) {
        assert_eq!(SessionCommand::parse(line), Ok(expected));
    }

    #[test]
    fn parses_algorithm_parameters() {
        let command = SessionCommand::parse("chain blur size=3 type=M").expect("valid");
        let SessionCommand::Chain(params) = command else {
            panic!("expected chain, got {command:?}");
        };
        assert_eq!(params.algorithm(), Some("blur"));
        assert_eq!(params.get("size"), Some("3"));
        assert_eq!(params.get("type"), Some("M"));
    }

    #[test]
    fn rejects_unknown_commands() {
        assert!(SessionCommand::parse("rotate").is_err());
        assert!(SessionCommand::parse("   ").is_err());
    }
}
