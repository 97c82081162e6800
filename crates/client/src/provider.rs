//! Terminal prompt for manually controlled combatants.

use async_trait::async_trait;
use battle_core::{CombatantId, PendingAction, TimedAction};
use battle_runtime::{ActionRequest, PlayerAction, PlayerActionProvider, RuntimeError};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Reads `<skill> [target ids...]` from stdin. An empty line or end of input
/// takes the default action.
pub struct StdinProvider {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl StdinProvider {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

#[async_trait]
impl PlayerActionProvider for StdinProvider {
    async fn provide_action(&self, request: &ActionRequest) -> battle_runtime::Result<PlayerAction> {
        print_prompt(request);
        let mut lines = self.lines.lock().await;
        loop {
            let line = lines
                .next_line()
                .await
                .map_err(|e| RuntimeError::Provider(e.to_string()))?;
            let Some(line) = line else {
                return Ok(PlayerAction::from(&request.pending));
            };
            match parse_choice(&line, &request.pending) {
                Ok(action) => return Ok(action),
                Err(message) => println!("{} (try again, or press enter for the default)", message),
            }
        }
    }
}

fn print_prompt(request: &ActionRequest) {
    let roster = &request.snapshot.roster;
    let Some(actor) = roster.get(request.actor()) else {
        return;
    };
    println!("-- {}{} ({}/{} HP) --", actor.name, actor.id(), actor.hp(), actor.max_hp());
    for (index, skill) in actor.skills().iter().enumerate() {
        let status = if skill.is_cooldown_exempt() || skill.is_ready() {
            "ready".to_string()
        } else {
            format!("{} turns", skill.cooldown())
        };
        println!("  [{}] {} ({})", index, skill.def.display_name, status);
    }
    let targets = roster
        .iter()
        .filter(|c| c.is_alive())
        .map(|c| format!("{}{} {}", c.name, c.id(), c.team))
        .collect::<Vec<_>>();
    println!("  targets: {}", targets.join(", "));
    println!(
        "  > skill [targets] (default: {} on {:?})",
        request.pending.skill_index, request.pending.targets
    );
}

/// Parses one answer line. Target ids may be written as `3` or `#3`.
fn parse_choice(line: &str, pending: &PendingAction) -> Result<PlayerAction, String> {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return Ok(PlayerAction::from(pending));
    };
    let skill_index = first
        .parse::<usize>()
        .map_err(|_| format!("'{}' is not a skill number", first))?;
    let targets = tokens
        .map(|token| {
            token
                .trim_start_matches('#')
                .parse::<u32>()
                .map(CombatantId)
                .map_err(|_| format!("'{}' is not a combatant id", token))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PlayerAction {
        skill_index,
        targets,
    })
}
