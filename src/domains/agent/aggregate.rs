use super::gossip::{Fact, FactKind, GossipMessage, Mailbox};
use super::knowledge::KnowledgeStore;
use super::negotiation::NegotiationParty;
use crate::domains::grid::{AgentId, Direction, Position, TeamId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    /// A known orb or hole, locked for the team.
    Item,
    /// Random cell chosen when nothing useful is known.
    Exploration,
    /// Adjacent cell proposed by a decision policy.
    Policy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub position: Position,
    pub kind: TargetKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentStatus {
    Interacting,
    Targeting,
    Moving,
    Idle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub team: TeamId,
    pub position: Position,
    pub facing: Direction,
    pub energy: i32,
    pub carrying: bool,
    pub target: Option<Target>,
    /// Set by the negotiator: step forward next turn without re-aiming.
    pub accelerated: bool,
    pub status: AgentStatus,
    pub knowledge: KnowledgeStore,
    #[serde(skip)]
    mailbox: Mailbox,
}

impl Agent {
    pub fn new(id: AgentId, team: TeamId, position: Position, energy: i32) -> Self {
        Self {
            id,
            team,
            position,
            facing: Direction::Up,
            energy,
            carrying: false,
            target: None,
            accelerated: false,
            status: AgentStatus::Idle,
            knowledge: KnowledgeStore::new(),
            mailbox: Mailbox::default(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.energy <= 0
    }

    pub fn is_retired(&self) -> bool {
        self.energy < 0
    }

    pub fn target_position(&self) -> Option<Position> {
        self.target.map(|t| t.position)
    }

    /// Queue a fact for teammates.
    pub fn gossip(&mut self, fact: Fact) {
        self.mailbox.post(fact);
    }

    pub fn take_outbox(&mut self) -> Vec<Fact> {
        self.mailbox.take_outbox()
    }

    pub fn deliver(&mut self, message: GossipMessage) {
        self.mailbox.deliver(message);
    }

    pub fn pending_messages(&self) -> usize {
        self.mailbox.pending()
    }

    /// Merge every queued teammate fact into the own knowledge store.
    pub fn drain_inbox(&mut self) -> usize {
        let messages = self.mailbox.drain_inbox();
        for message in &messages {
            self.knowledge.apply(&message.fact);
        }
        messages.len()
    }

    /// Commit to an item target: lock it for the team.
    pub fn lock_target(&mut self, position: Position) {
        self.release_target();
        self.target = Some(Target {
            position,
            kind: TargetKind::Item,
        });
        if self.knowledge.lock(position) {
            self.gossip(Fact::add(FactKind::Lock, vec![position]));
        }
    }

    pub fn set_target(&mut self, position: Position, kind: TargetKind) {
        self.release_target();
        self.target = Some(Target { position, kind });
    }

    /// Drop the current target; an item target is unlocked for the team.
    pub fn release_target(&mut self) {
        if let Some(target) = self.target.take() {
            if target.kind == TargetKind::Item && self.knowledge.unlock(target.position) {
                self.gossip(Fact::remove(FactKind::Lock, vec![target.position]));
            }
        }
    }

    /// Turn towards the target, horizontal axis first.
    pub fn face_target(&mut self) {
        let Some(target) = self.target_position() else {
            return;
        };
        let here = self.position;
        let direction = if here.x < target.x {
            Direction::Right
        } else if here.x > target.x {
            Direction::Left
        } else if here.y < target.y {
            Direction::Down
        } else if here.y > target.y {
            Direction::Up
        } else {
            return;
        };
        while self.facing != direction {
            self.facing = self.facing.turn_clockwise();
        }
    }

    pub fn negotiation_party(&self) -> NegotiationParty {
        NegotiationParty {
            position: self.position,
            facing: self.facing,
            target: self.target_position(),
            energy: self.energy,
        }
    }
}
