use crate::cli::SeedArgs;
use crate::infra::{build_service, AppService};
use bidflow::config::AppConfig;
use bidflow::error::AppError;
use bidflow::workflows::pipeline::{
    Decision, ReasonResolution, ReviewSession, ReviewStep,
};
use clap::Args;
use std::io::{self, BufRead, Write};

const CANCEL_REASON: &str = "/cancel";

#[derive(Args, Debug, Default)]
pub(crate) struct ReviewArgs {
    /// Company id to review (defaults to the company with the most pending matches)
    #[arg(long)]
    pub(crate) company: Option<String>,
    #[command(flatten)]
    pub(crate) seed: SeedArgs,
}

/// Tally of what a terminal review session did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReviewTally {
    pub(crate) applied: usize,
    pub(crate) reasons_cancelled: usize,
    pub(crate) completed: bool,
}

pub(crate) fn run_review(args: ReviewArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let (service, _) = build_service(args.seed.resolve(&config))?;

    let groups = service.company_groups();
    let group = match args.company.as_deref() {
        Some(company) => groups
            .into_iter()
            .find(|group| group.company_id == company),
        None => groups.into_iter().next(),
    };

    let Some(group) = group else {
        println!("Nothing to review: matching queue is empty for that selection");
        return Ok(());
    };

    println!(
        "Reviewing {} ({} pending matches)",
        group.company_name, group.count
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let tally = review_loop(
        &service,
        ReviewSession::start(group),
        stdin.lock(),
        stdout.lock(),
    )?;

    println!(
        "\n{} decisions applied, {} reasons cancelled, session {}",
        tally.applied,
        tally.reasons_cancelled,
        if tally.completed { "complete" } else { "cancelled" }
    );
    let summary = service.summary();
    println!(
        "Queues now: {} matching | {} qualification | {} proposal",
        summary.matching, summary.qualification, summary.proposal
    );

    Ok(())
}

fn read_trimmed<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Drive `session` from line-oriented input: `y`, `n`, `s` decide and `x` quits.
///
/// End of input cancels the session; at a reason prompt it cancels the pending decision.
pub(crate) fn review_loop<R, W>(
    service: &AppService,
    mut session: ReviewSession,
    mut input: R,
    mut output: W,
) -> Result<ReviewTally, AppError>
where
    R: BufRead,
    W: Write,
{
    let mut tally = ReviewTally::default();

    while let Some(record) = session.current().cloned() {
        let position = session.cursor().unwrap_or_default() + 1;
        writeln!(
            output,
            "\n[{}/{}] {} | {} | due {} | {}% match | {} priority",
            position,
            session.len(),
            record.name,
            record.company_name,
            record.due_date,
            record.match_percentage,
            record.priority.label()
        )?;
        write!(output, "Decide (y)es / (n)o / (s)oft / e(x)it: ")?;
        output.flush()?;

        let Some(answer) = read_trimmed(&mut input)? else {
            session.cancel();
            break;
        };

        let decision = match answer.to_ascii_lowercase().as_str() {
            "y" | "yes" => Decision::Yes,
            "n" | "no" => Decision::No,
            "s" | "soft" => Decision::Soft,
            "x" | "exit" => {
                session.cancel();
                break;
            }
            other => {
                writeln!(output, "Unrecognized choice '{other}'")?;
                continue;
            }
        };

        match session.decide(service, decision, None)? {
            ReviewStep::ReasonRequested { prompt } => {
                write!(output, "{prompt} (enter to skip, {CANCEL_REASON} to undo): ")?;
                output.flush()?;

                let resolution = match read_trimmed(&mut input)? {
                    Some(text) if text != CANCEL_REASON => ReasonResolution::Submit(text),
                    _ => ReasonResolution::Cancel,
                };

                match session.resolve_reason(service, resolution)? {
                    ReviewStep::Reverted { .. } => {
                        tally.reasons_cancelled += 1;
                        writeln!(output, "Decision cancelled")?;
                    }
                    _ => tally.applied += 1,
                }
            }
            _ => tally.applied += 1,
        }
    }

    tally.completed = session.is_closed();
    Ok(tally)
}
