//! Guard Patrol Agent
//!
//! This example wires a guard that patrols until it hears a noise,
//! investigates, and then returns to patrolling.
//!
//! Key concepts:
//! - One behavior tree per machine state
//! - Leaf handlers shared across trees by action id
//! - Multi-tick leaves using the step counter
//! - Returning to the previous state with `pop_state`
//!
//! Run with: RUST_LOG=agentmind=debug cargo run --example guard_patrol

use agentmind::agent::{Agent, AgentConfig, BaseAgent, StateHooks};
use agentmind::behavior::{NodeMeta, NodeState};
use agentmind::builder::TreeBuilder;
use agentmind::core::Param;

const PATROL: &str = "agent_state_idle";
const INVESTIGATE: &str = "investigate";

const WALK_TO: u32 = 1;
const LOOK_AROUND: u32 = 2;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "agentmind=debug".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    println!("=== Guard Patrol Agent ===\n");

    let config = AgentConfig {
        reset_tree_on_enter: true,
        ..AgentConfig::default()
    };
    let mut guard = BaseAgent::new(1, config);

    // Walking takes `max_step` ticks; the waypoint name is bound as a param.
    guard.add_leaf_handler(WALK_TO, |node: &mut NodeMeta, params: &[Param]| {
        node.update_step();
        let waypoint = params.first().and_then(Param::as_text).unwrap_or("?");
        println!("  walking to {waypoint} ({}/{})", node.step(), node.max_step());
        if node.steps_exhausted() {
            NodeState::Succeeded
        } else {
            NodeState::Executing
        }
    })?;
    guard.add_leaf_handler(LOOK_AROUND, |_: &mut NodeMeta, _: &[Param]| {
        println!("  looking around... nothing here");
        NodeState::Succeeded
    })?;

    let patrol_tree = TreeBuilder::new(1)
        .leaf(2, WALK_TO, 2, vec![Param::from("gate")])
        .leaf(3, WALK_TO, 2, vec![Param::from("tower")])
        .build()?;
    let investigate_tree = TreeBuilder::new(2)
        .parallel(10)
        .leaf(11, WALK_TO, 1, vec![Param::from("noise")])
        .leaf(12, LOOK_AROUND, 0, vec![])
        .end()
        .build()?;

    guard.add_state(
        PATROL,
        Some(patrol_tree),
        StateHooks::new().on_enter(|from| println!("  [enter patrol from '{from}']")),
    )?;
    guard.add_state(
        INVESTIGATE,
        Some(investigate_tree),
        StateHooks::new().on_exit(|to| println!("  [leave investigate for '{to}']")),
    )?;
    guard.add_action("loud_enough", |_: &str, params: &[Param]| {
        params.first().and_then(Param::as_int).unwrap_or(0) >= 30
    })?;
    guard.add_transition(PATROL, "noise", INVESTIGATE, "loud_enough")?;

    guard.start()?;
    for tick in 1..=3 {
        println!("tick {tick}");
        guard.update(16);
    }

    println!("\nfaint noise (10 dB)");
    println!("  -> {:?}", guard.trigger("noise", &[Param::from(10)])?);
    println!("loud noise (60 dB)");
    println!("  -> {:?}", guard.trigger("noise", &[Param::from(60)])?);

    for tick in 4..=5 {
        println!("tick {tick}");
        guard.update(16);
    }

    println!("\nback to patrol");
    guard.pop_state()?;
    guard.update(16);

    println!("\nFinal state: {:?}", guard.current_state());
    println!("\n=== Example Complete ===");
    Ok(())
}
