use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::activity::{Activity, ServerSideAgent};
use crate::config::{NO_SUB_TARGET, UNIT_BIRTH_TURN_UNSET};
use crate::map::{Direction8, TileIndex};

// =============================================================================
// Orders
// =============================================================================

/// Kind of a single unit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    Move,
    ActionMove,
    FullMp,
    Activity,
    PerformAction,
}

impl OrderKind {
    pub const ALL: [OrderKind; 5] = [
        OrderKind::Move,
        OrderKind::ActionMove,
        OrderKind::FullMp,
        OrderKind::Activity,
        OrderKind::PerformAction,
    ];

    /// Letter used in `orders_list`.
    pub fn to_char(self) -> char {
        match self {
            OrderKind::Move => 'm',
            OrderKind::ActionMove => 'a',
            OrderKind::FullMp => 'f',
            OrderKind::Activity => 'x',
            OrderKind::PerformAction => 'p',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.to_char() == c)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitOrder {
    pub order: OrderKind,
    /// Direction of a move, `None` when the order acts on the unit's own tile.
    pub dir: Option<Direction8>,
    pub activity: Option<Activity>,
    pub action: Option<Action>,
    /// Absolute target tile of the order.
    pub target: Option<TileIndex>,
    pub sub_target: i64,
}

impl UnitOrder {
    pub fn new(order: OrderKind) -> Self {
        Self {
            order,
            dir: None,
            activity: None,
            action: None,
            target: None,
            sub_target: NO_SUB_TARGET,
        }
    }

    pub fn perform(action: Action, target: Option<TileIndex>) -> Self {
        Self {
            action: Some(action),
            target,
            ..Self::new(OrderKind::PerformAction)
        }
    }

    /// Whether executing this order moves the unit to another tile.
    pub fn moves_unit(&self) -> bool {
        match self.order {
            OrderKind::Move | OrderKind::ActionMove => true,
            OrderKind::PerformAction => self.action.is_some_and(Action::moves_actor),
            OrderKind::FullMp | OrderKind::Activity => false,
        }
    }
}

/// Pending orders of a unit. `index` is the next order to execute.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitOrders {
    pub list: Vec<UnitOrder>,
    pub index: usize,
    pub repeat: bool,
    pub vigilant: bool,
}

impl UnitOrders {
    pub fn has_orders(&self) -> bool {
        !self.list.is_empty()
    }

    pub fn clear(&mut self) {
        self.list.clear();
        self.index = 0;
        self.repeat = false;
        self.vigilant = false;
    }
}

// =============================================================================
// Unit
// =============================================================================

#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: u32,
    pub owner: usize,
    pub unit_type: String,
    pub tile: TileIndex,
    pub activity: Activity,
    pub ssa: ServerSideAgent,
    pub birth_turn: i64,
}

impl Unit {
    pub fn new(id: u32, owner: usize, unit_type: impl Into<String>, tile: TileIndex) -> Self {
        Self {
            id,
            owner,
            unit_type: unit_type.into(),
            tile,
            activity: Activity::Idle,
            ssa: ServerSideAgent::None,
            birth_turn: UNIT_BIRTH_TURN_UNSET,
        }
    }
}
