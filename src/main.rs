use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kalends::{Algorithm, Calendar, DateTime, Interval, Period, PeriodType, Zone, config};

#[derive(Parser)]
#[command(name = "kalends", version, about = "Calendar-aware date and time arithmetic")]
struct Cli {
    /// Zone for reading and printing instants, e.g. Europe/Paris or +02:00
    #[arg(long, global = true)]
    zone: Option<String>,

    /// Calendar system: iso, gregorian, julian, buddhist, coptic or ethiopic
    #[arg(long, global = true, default_value = "iso")]
    calendar: String,

    #[command(subcommand)]
    command: Option<Command>,
}

/// One line of the interactive prompt.
#[derive(Parser)]
#[command(no_binary_name = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every calendar field of an instant ("now" for the clock)
    Fields { instant: String },
    /// Print the period between two instants
    Period {
        start: String,
        end: String,
        /// Period type name, e.g. YearMonthDay or DayTime
        #[arg(long = "type", default_value = "Standard")]
        period_type: String,
    },
    /// Add an ISO period such as P1M2DT3H to an instant
    Plus { instant: String, period: String },
    /// Print the duration and standard period of start/end, start/period or period/end
    Interval { text: String },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Calendar(#[from] kalends::Error),
    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}

struct Session {
    calendar: Calendar,
}

impl Session {
    fn new(zone: Option<&str>, calendar: &str) -> kalends::Result<Session> {
        if let Some(zone) = zone {
            config::set_default_zone(Zone::for_id(zone)?);
        }
        let algorithm = Algorithm::from_name(calendar)?;
        let calendar = Calendar::of(algorithm, config::default_zone())?;
        Ok(Session { calendar })
    }

    fn instant(&self, text: &str) -> kalends::Result<DateTime> {
        if text.eq_ignore_ascii_case("now") {
            return Ok(DateTime::now_in(self.calendar.clone()));
        }
        let parsed = DateTime::parse_in_zone(text, self.calendar.zone())?;
        Ok(parsed.with_calendar(self.calendar.clone()))
    }

    fn run(&self, command: &Command, out: &mut impl Write) -> Result<(), CliError> {
        match command {
            Command::Fields { instant } => {
                let instant = self.instant(instant)?;
                writeln!(out, "{instant} {}", self.calendar)?;
                for field in self.calendar.fields() {
                    writeln!(out, "  {:<20} {}", field.name(), field.get(instant.millis()))?;
                }
            }
            Command::Period {
                start,
                end,
                period_type,
            } => {
                let period_type = PeriodType::for_name(period_type)?;
                let period = Period::between(&self.instant(start)?, &self.instant(end)?, &period_type)?;
                writeln!(out, "{period}")?;
            }
            Command::Plus { instant, period } => {
                let period: Period = period.parse()?;
                writeln!(out, "{}", self.instant(instant)?.plus_period(&period)?)?;
            }
            Command::Interval { text } => {
                let interval = text
                    .parse::<Interval>()?
                    .with_calendar(self.calendar.clone());
                writeln!(out, "{interval}")?;
                writeln!(out, "  duration {}", interval.to_duration()?)?;
                writeln!(out, "  period   {}", interval.to_period(&PeriodType::standard())?)?;
            }
        }
        Ok(())
    }
}

fn run_repl(session: &Session) -> ExitCode {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut status = ExitCode::SUCCESS;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("read error: {err}");
                return ExitCode::from(1);
            }
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        if matches!(words[0], "quit" | "exit") {
            break;
        }
        match Line::try_parse_from(words) {
            Ok(parsed) => {
                match session.run(&parsed.command, &mut stdout) {
                    Ok(()) => {}
                    Err(err @ CliError::Output(_)) => {
                        eprintln!("error: {err}");
                        return ExitCode::from(1);
                    }
                    Err(err) => {
                        eprintln!("error: {err}");
                        status = ExitCode::from(1);
                    }
                }
            }
            Err(err) => {
                let _ = err.print();
            }
        }
        if let Err(err) = stdout.flush() {
            eprintln!("error: cannot write output: {err}");
            return ExitCode::from(1);
        }
    }
    status
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let session = match Session::new(cli.zone.as_deref(), &cli.calendar) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(1);
        }
    };

    let Some(command) = &cli.command else {
        return run_repl(&session);
    };
    match session.run(command, &mut io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn output_failures_are_errors() {
        let session = Session {
            calendar: Calendar::iso_utc(),
        };
        let command = Command::Plus {
            instant: "2004-06-09T00:00Z".to_string(),
            period: "P1D".to_string(),
        };
        let err = session.run(&command, &mut ClosedPipe).unwrap_err();
        assert!(matches!(err, CliError::Output(_)));
        let mut out = Vec::new();
        session.run(&command, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2004-06-10T00:00:00.000Z\n");
    }
}
