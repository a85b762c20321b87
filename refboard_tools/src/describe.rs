use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use anyhow::Context;
use chrono::SecondsFormat;
use clap::{Args, Parser, Subcommand};
use flate2::read::GzDecoder;
use log::{info, warn};
use refboard::{describe_command, map_game_event_to_text, map_stage_to_text, RefereeSummary};
use refboard_api::{game_event_from_json, referee_message_from_json, Command, ProtoEnum, ProtocolError, Stage};

/// Prints the referee board's text for recorded game controller output
#[derive(Parser)]
#[command(name = "describe", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// One game event per line
    Events(DumpArgs),

    /// One referee message per line
    Referee(DumpArgs),

    /// Every known stage and command with its text
    Tables,
}

#[derive(Args)]
struct DumpArgs {
    /// Newline-delimited JSON, optionally gzipped. Reads stdin if absent or `-`.
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    file: Option<PathBuf>,

    /// Print one JSON object per line instead of plain text
    #[arg(long)]
    json: bool,

    /// Log lines that fail to parse and keep going
    #[arg(long)]
    skip_invalid: bool,
}

#[derive(Copy, Clone)]
enum Dump {
    Events,
    Referee,
}

impl Dump {
    fn describe(self, line: &str) -> Result<String, ProtocolError> {
        match self {
            Dump::Events => {
                let event = game_event_from_json(line)?;
                let text = map_game_event_to_text(&event);
                Ok(match event.created() {
                    Some(created) => format!("[{}] {text}", created.to_rfc3339_opts(SecondsFormat::Millis, true)),
                    None => text,
                })
            }
            Dump::Referee => {
                let message = referee_message_from_json(line)?;
                Ok(RefereeSummary::from(&message).to_string())
            }
        }
    }

    fn separator(self) -> &'static str {
        match self {
            Dump::Events => "",
            // Summaries span several lines
            Dump::Referee => "\n",
        }
    }
}

fn open_input(path: Option<&Path>) -> anyhow::Result<Box<dyn BufRead>> {
    let Some(path) = path.filter(|path| *path != Path::new("-")) else {
        return Ok(Box::new(io::stdin().lock()));
    };
    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    if path.extension().map_or(false, |ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Returns how many lines were described
fn describe_lines(reader: impl BufRead, out: &mut impl Write, dump: Dump, args: &DumpArgs) -> anyhow::Result<usize> {
    let mut described = 0;
    for (i, line) in reader.lines().enumerate() {
        let line_number = i + 1;
        let line = line.with_context(|| format!("Failed to read line {line_number}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let text = match dump.describe(&line) {
            Ok(text) => text,
            Err(err) if args.skip_invalid => {
                warn!("Skipping line {line_number}: {err}");
                continue;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to parse line {line_number}"));
            }
        };

        if args.json {
            writeln!(out, "{}", serde_json::json!({"line": line_number, "text": text}))?;
        } else {
            writeln!(out, "{}{text}", if described > 0 { dump.separator() } else { "" })?;
        }
        described += 1;
    }
    Ok(described)
}

fn print_tables(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Stages:")?;
    for stage in Stage::ALL {
        let value = i32::from(*stage);
        writeln!(out, "{value:>3}  {:<24} {}", stage.name(), map_stage_to_text(value))?;
    }
    writeln!(out, "\nCommands:")?;
    for command in Command::ALL {
        let value = i32::from(*command);
        writeln!(out, "{value:>3}  {:<24} {}", command.name(), describe_command(value))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut out = io::stdout().lock();
    match cli.command {
        Commands::Events(args) => run_dump(Dump::Events, &args, &mut out),
        Commands::Referee(args) => run_dump(Dump::Referee, &args, &mut out),
        Commands::Tables => print_tables(&mut out).context("Failed to write tables"),
    }
}

fn run_dump(dump: Dump, args: &DumpArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let reader = open_input(args.file.as_deref())?;
    let described = describe_lines(reader, out, dump, args)?;
    info!("Described {described} lines");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use pretty_assertions::assert_eq;
    use super::*;

    const EVENTS: &str = r#"{"aimlessKick": {"byTeam": "BLUE", "byBot": 3}}

{"createdTimestamp": "1700000000500000", "botTooFastInStop": {"byTeam": "YELLOW", "byBot": 1, "speed": 1.62}}
"#;

    fn args(json: bool, skip_invalid: bool) -> DumpArgs {
        DumpArgs { file: None, json, skip_invalid }
    }

    fn run(input: &str, dump: Dump, args: &DumpArgs) -> anyhow::Result<String> {
        let mut out = Vec::new();
        describe_lines(Cursor::new(input), &mut out, dump, args)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn describes_events() {
        let output = run(EVENTS, Dump::Events, &args(false, false)).unwrap();
        assert_eq!(output, [
            r#"<span class="team-blue">Blue</span> 3 无意义射门"#,
            r#"[2023-11-14T22:13:20.500Z] <span class="team-yellow">Yellow</span> 1 在停止阶段超速(1.7m/s)"#,
            "",
        ].join("\n"));
    }

    #[test]
    fn json_output_keeps_line_numbers() {
        let output = run(EVENTS, Dump::Events, &args(true, false)).unwrap();
        let lines: Vec<serde_json::Value> = output.lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["line"], 1);
        assert_eq!(lines[1]["line"], 3);
        assert_eq!(lines[0]["text"], r#"<span class="team-blue">Blue</span> 3 无意义射门"#);
    }

    #[test]
    fn bad_line_aborts_with_its_number() {
        let input = "{\"goal\": {}}\n[1]\n";
        let err = run(input, Dump::Events, &args(false, false)).unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse line 2");
    }

    #[test]
    fn bad_line_can_be_skipped() {
        let input = "not json\n{\"goal\": {\"byTeam\": 2}}\n";
        let output = run(input, Dump::Events, &args(false, true)).unwrap();
        assert_eq!(output, "<span class=\"team-blue\">Blue</span> 进球有效\n");
    }

    #[test]
    fn referee_summaries_are_separated() {
        let input = concat!(
            r#"{"stage": "NORMAL_FIRST_HALF", "command": "STOP", "yellow": {"score": 1}}"#, "\n",
            r#"{"stage": 1, "command": "FORCE_START", "yellow": {"score": 1}, "blue": {"score": 1}}"#, "\n",
        );
        let output = run(input, Dump::Referee, &args(false, false)).unwrap();
        let yellow = r#"<span class="team-yellow">Yellow</span>"#;
        let blue = r#"<span class="team-blue">Blue</span>"#;
        assert_eq!(output, format!(
            "上半场\n{yellow} 1 : 0 {blue}\nStop Game\n\n上半场\n{yellow} 1 : 1 {blue}\nForce Start\n"
        ));
    }

    #[test]
    fn tables_list_everything() {
        let mut out = Vec::new();
        print_tables(&mut out).unwrap();
        let tables = String::from_utf8(out).unwrap();
        assert!(tables.contains("13  POST_GAME                比赛结束"));
        assert!(tables.contains(r#" 17  BALL_PLACEMENT_BLUE      Ball Placement <span class="team-blue">Blue</span>"#));
        assert_eq!(tables.lines().count(), 14 + 18 + 3);
    }

    #[test]
    fn reads_gzipped_files() {
        let path = std::env::temp_dir().join(format!("refboard-describe-{}.ndjson.gz", std::process::id()));
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(EVENTS.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let mut out = Vec::new();
        let described = describe_lines(open_input(Some(path.as_path())).unwrap(), &mut out, Dump::Events, &args(false, false));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(described.unwrap(), 2);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = open_input(Some(Path::new("/nonexistent/dump.ndjson"))).err().unwrap();
        assert_eq!(err.to_string(), "Failed to open /nonexistent/dump.ndjson");
    }
}
