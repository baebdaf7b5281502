//! Vetoed Transitions
//!
//! This example shows a gating action refusing a transition, and how the
//! refusal differs from an error.
//!
//! Key concepts:
//! - Gates receive the event and its params
//! - A veto is `Ok(Triggered::Vetoed)` with no hooks run
//! - Unknown events are errors
//!
//! Run with: cargo run --example vetoed_transition

use agentmind::builder::FsmBuilder;
use agentmind::core::{Param, State};
use agentmind::fsm::Triggered;

struct Announce(&'static str);

impl State for Announce {
    fn on_enter(&mut self, from: &str) {
        println!("  {} entered from '{}'", self.0, from);
    }

    fn on_exit(&mut self, to: &str) {
        println!("  {} exiting to '{}'", self.0, to);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Vetoed Transitions ===\n");

    let machine = FsmBuilder::new()
        .id(9)
        .state("Sleeping", Announce("Sleeping"))
        .state("Awake", Announce("Awake"))
        .action("alarm_set", |event: &str, params: &[Param]| {
            let hour = params.first().and_then(Param::as_int).unwrap_or(0);
            println!("  gate '{event}' sees hour {hour}");
            hour >= 7
        })
        .gated_transition("Sleeping", "tick", "Awake", "alarm_set")
        .initial("Sleeping")
        .start();

    let mut machine = match machine {
        Ok(machine) => machine,
        Err(error) => {
            eprintln!("failed to build machine: {error}");
            return;
        }
    };

    for hour in [5, 6, 7] {
        match machine.trigger("tick", &[Param::from(hour)]) {
            Ok(Triggered::Vetoed) => println!("  still {:?}\n", machine.current_state()),
            Ok(Triggered::Transitioned) => println!("  now {:?}\n", machine.current_state()),
            Err(error) => println!("  error: {error}\n"),
        }
    }

    match machine.trigger("snooze", &[]) {
        Ok(outcome) => println!("unexpected: {outcome:?}"),
        Err(error) => println!("snooze is not a transition: {error}"),
    }

    println!("\n=== Example Complete ===");
}
