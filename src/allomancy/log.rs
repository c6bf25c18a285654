//! Burn logging
//!
//! Records every burn transition and world-changing effect, tick-stamped,
//! for display and post-run analysis.

use bevy::prelude::*;
use std::fs;
use std::path::Path;

use super::events::{BurnTransition, DeactivationReason, TickEffects};

/// A single entry in the burn log
#[derive(Debug, Clone, PartialEq)]
pub struct BurnLogEntry {
    /// Simulation tick the entry was recorded on
    pub tick: u64,
    /// Name of the agent the entry is about
    pub agent: String,
    /// The type of event
    pub event_type: BurnLogEventType,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of burn log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurnLogEventType {
    /// A metal was lit
    Activated,
    /// A metal was switched off or released
    Deactivated,
    /// A metal burned out
    Depleted,
    /// Flaring started or stopped
    Flare,
    /// An activation or reserve change was refused
    Denied,
    /// Reserve added
    Reserve,
    /// Coins torn out of a mobile
    Extraction,
    /// A burner anchored on a tile
    Anchor,
    /// Status applied or lifted
    Status,
    /// Run event (start, end, etc.)
    ScenarioEvent,
}

/// The burn log resource storing all events
#[derive(Resource, Default, Debug)]
pub struct BurnLog {
    /// All log entries in chronological order
    pub entries: Vec<BurnLogEntry>,
}

impl BurnLog {
    /// Clear the log for a new run
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Add a new entry to the log
    pub fn log(&mut self, tick: u64, agent: &str, event_type: BurnLogEventType, message: String) {
        self.entries.push(BurnLogEntry {
            tick,
            agent: agent.to_string(),
            event_type,
            message,
        });
    }

    /// Record everything worth keeping from one agent's tick
    pub fn record_effects(&mut self, tick: u64, agent: &str, effects: &TickEffects) {
        for transition in &effects.transitions {
            let (event_type, message) = match transition {
                BurnTransition::Activated(metal) => (BurnLogEventType::Activated, format!("{} lit", metal)),
                BurnTransition::Deactivated(metal, DeactivationReason::Released) => {
                    (BurnLogEventType::Deactivated, format!("{} extinguished", metal))
                }
                BurnTransition::Deactivated(metal, DeactivationReason::Depleted) => {
                    (BurnLogEventType::Depleted, format!("{} ran out", metal))
                }
                BurnTransition::FlareChanged(true) => (BurnLogEventType::Flare, "flaring".to_string()),
                BurnTransition::FlareChanged(false) => {
                    (BurnLogEventType::Flare, "stopped flaring".to_string())
                }
                BurnTransition::Denied(err) => (BurnLogEventType::Denied, format!("denied: {}", err)),
            };
            self.log(tick, agent, event_type, message);
        }

        for spawn in &effects.spawns {
            self.log(
                tick,
                agent,
                BurnLogEventType::Extraction,
                format!("tore {} coins from #{}", spawn.count, spawn.source),
            );
        }

        for cell in &effects.anchors {
            self.log(
                tick,
                agent,
                BurnLogEventType::Anchor,
                format!("anchored on cell ({}, {})", cell.x, cell.y),
            );
        }

        for status in &effects.statuses {
            self.log(
                tick,
                agent,
                BurnLogEventType::Status,
                format!("{:?} #{} for {} ticks", status.status, status.target, status.ticks),
            );
        }

        for removal in &effects.status_removals {
            self.log(
                tick,
                agent,
                BurnLogEventType::Status,
                format!("{:?} lifted from #{}", removal.status, removal.target),
            );
        }
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: BurnLogEventType) -> Vec<&BurnLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get entries about one agent
    pub fn for_agent(&self, agent: &str) -> Vec<&BurnLogEntry> {
        self.entries.iter().filter(|e| e.agent == agent).collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&BurnLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// One line of text per entry
    pub fn format_entry(entry: &BurnLogEntry) -> String {
        format!("[{:>6}] {}: {}", entry.tick, entry.agent, entry.message)
    }

    /// Write the log as text, returning the path written
    pub fn save_to_file(&self, path: &Path) -> Result<String, String> {
        let mut contents = String::new();
        for entry in &self.entries {
            contents.push_str(&Self::format_entry(entry));
            contents.push('\n');
        }
        fs::write(path, contents).map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allomancy::error::BurnError;
    use crate::allomancy::events::SpawnRequest;
    use crate::allomancy::metals::Metal;

    #[test]
    fn test_record_effects_maps_transitions() {
        let mut effects = TickEffects::default();
        effects.transitions.push(BurnTransition::Activated(Metal::Steel));
        effects
            .transitions
            .push(BurnTransition::Deactivated(Metal::Tin, DeactivationReason::Depleted));
        effects.transitions.push(BurnTransition::Denied(BurnError::NotPermitted(Metal::Zinc)));
        effects.spawns.push(SpawnRequest {
            kind: 71,
            count: 12,
            position: Vec2::ZERO,
            velocity: Vec2::X,
            source: 33,
        });

        let mut log = BurnLog::default();
        log.record_effects(5, "Vin", &effects);

        assert_eq!(log.entries.len(), 4);
        assert_eq!(log.entries[0].message, "Steel lit");
        assert_eq!(log.filter_by_type(BurnLogEventType::Depleted)[0].message, "Tin ran out");
        assert_eq!(
            log.filter_by_type(BurnLogEventType::Denied)[0].message,
            "denied: not permitted to burn Zinc"
        );
        assert_eq!(log.filter_by_type(BurnLogEventType::Extraction)[0].message, "tore 12 coins from #33");
    }

    #[test]
    fn test_recent_and_for_agent() {
        let mut log = BurnLog::default();
        log.log(1, "Vin", BurnLogEventType::Flare, "flaring".into());
        log.log(2, "Elend", BurnLogEventType::Flare, "flaring".into());
        log.log(3, "Vin", BurnLogEventType::Flare, "stopped flaring".into());

        assert_eq!(log.for_agent("Vin").len(), 2);
        let recent: Vec<u64> = log.recent(2).iter().map(|e| e.tick).collect();
        assert_eq!(recent, vec![2, 3]);
        assert_eq!(BurnLog::format_entry(&log.entries[0]), "[     1] Vin: flaring");
    }
}
