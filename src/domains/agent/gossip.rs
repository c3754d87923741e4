use crate::domains::grid::{AgentId, Position, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactKind {
    Orb,
    Hole,
    FilledHole,
    Lock,
    Visited,
    /// Cells the sender physically stood on.
    Traversed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Add,
    Remove,
}

/// An incremental piece of knowledge about a set of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub kind: FactKind,
    pub sign: Sign,
    pub positions: Vec<Position>,
}

impl Fact {
    pub fn add(kind: FactKind, positions: Vec<Position>) -> Self {
        Self {
            kind,
            sign: Sign::Add,
            positions,
        }
    }

    pub fn remove(kind: FactKind, positions: Vec<Position>) -> Self {
        Self {
            kind,
            sign: Sign::Remove,
            positions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GossipMessage {
    pub from: AgentId,
    pub round: u64,
    pub fact: Fact,
}

/// Per-agent message buffers. Facts learned during a turn go to the outbox;
/// the scheduler copies them into each teammate's inbox when the turn ends.
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    inbox: VecDeque<GossipMessage>,
    outbox: Vec<Fact>,
}

impl Mailbox {
    pub fn post(&mut self, fact: Fact) {
        if !fact.positions.is_empty() {
            self.outbox.push(fact);
        }
    }

    pub fn take_outbox(&mut self) -> Vec<Fact> {
        std::mem::take(&mut self.outbox)
    }

    pub fn deliver(&mut self, message: GossipMessage) {
        self.inbox.push_back(message);
    }

    pub fn drain_inbox(&mut self) -> Vec<GossipMessage> {
        self.inbox.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.inbox.len()
    }
}

/// Static friend graph: agents of the same team are mutual peers.
#[derive(Debug, Clone, Default)]
pub struct TeamRoster {
    teams: BTreeMap<TeamId, Vec<AgentId>>,
    team_of: HashMap<AgentId, TeamId>,
}

impl TeamRoster {
    pub fn build<'a, I>(members: I) -> Self
    where
        I: IntoIterator<Item = (&'a AgentId, TeamId)>,
    {
        let mut roster = Self::default();
        for (agent_id, team) in members {
            if roster.team_of.contains_key(agent_id) {
                continue;
            }
            roster.team_of.insert(agent_id.clone(), team);
            roster.teams.entry(team).or_default().push(agent_id.clone());
        }
        roster
    }

    pub fn team_of(&self, agent_id: &str) -> Option<TeamId> {
        self.team_of.get(agent_id).copied()
    }

    pub fn members(&self, team: TeamId) -> &[AgentId] {
        self.teams.get(&team).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn teams(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.teams.keys().copied()
    }

    pub fn friends_of<'a>(&'a self, agent_id: &'a str) -> impl Iterator<Item = &'a AgentId> + 'a {
        self.team_of(agent_id)
            .map(|team| self.members(team))
            .unwrap_or(&[])
            .iter()
            .filter(move |member| member.as_str() != agent_id)
    }

    pub fn are_teammates(&self, a: &str, b: &str) -> bool {
        match (self.team_of(a), self.team_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }
}
