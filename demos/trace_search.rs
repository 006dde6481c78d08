//! This program walks through a small search step by step.
//!
//! The problem is typed into a [`Table`], shared as a link through the codec,
//! and then solved three times: once with every event sent to `tracing`, once
//! recording the events, and once more while a [`Replay`] scrubs the recording
//! backwards to the start.
//!
//! Run it with `RUST_LOG=multi_covers=trace` to see every event.
use multi_covers::{codec, EventLog, Replay, Table, TracingEvents};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("multi_covers=debug")),
        )
        .init();

    let mut table = Table::new(["1", "2", "3", "4", "5"]);
    table.set_target("3", "2")?;
    let x = Some("");
    table.push_row("A", [None, x, x, x, None]);
    table.push_row("B", [x, x, None, x, x]);
    table.push_row("C", [x, None, None, None, x]);
    table.push_row("D", [x, x, x, x, None]);
    table.push_row("E", [None, None, Some("2"), None, None]);

    let link = codec::encode(&table.to_problem()?)?;
    println!("shared as ?problem={link}");
    let problem = codec::decode::<String, String>(&link)?;

    for solution in problem.solve_with(TracingEvents) {
        println!("solution: {}", solution.join(" "));
    }

    let mut solutions = problem.solve_with(EventLog::new());
    let found: Vec<_> = solutions.by_ref().collect();
    println!("{} solution(s); {}", found.len(), solutions.statistics());
    let log = solutions.into_events();

    let mut replay = Replay::new(&problem);
    for event in log.events() {
        replay.apply(event);
    }
    for (step, event) in log.events().iter().enumerate().rev() {
        replay.undo(event);
        let selection = replay.selection().join(" ");
        println!("{step:>4}: {event:?} -> [{selection}]");
    }
    assert_eq!(replay, Replay::new(&problem));
    Ok(())
}
