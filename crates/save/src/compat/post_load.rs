//! Fixups that need the loaded units and the current ruleset.
//!
//! Failures here are per unit: a unit whose orders cannot be migrated loses
//! its orders and the load goes on.

use bevy::prelude::*;

use game::config::NO_SUB_TARGET;
use game::unit::{OrderKind, Unit, UnitOrder, UnitOrders};
use game::{Action, Activity, GameMap, Ruleset, ServerSideAgent, TileIndex};

use crate::load_session::{FormatClass, LoadSession};
use crate::save_error::SaveError;

pub(super) fn compat_post_load_030100(
    session: &mut LoadSession,
    world: &mut World,
    format: FormatClass,
) -> Result<(), SaveError> {
    session.check()?;
    let ruleset = session.ruleset();
    let Some(map) = world.get_resource::<GameMap>().cloned() else {
        return Err(SaveError::Structural("no map loaded".into()));
    };

    let mut cleared = 0;
    let mut query = world.query::<(&mut Unit, &mut UnitOrders)>();
    for (mut unit, mut orders) in query.iter_mut(world) {
        if format == FormatClass::Savegame3 {
            upgrade_attacks(ruleset, &unit.unit_type, &mut orders.list);
            renumber_sabotage_targets(&mut orders.list);
        }

        if unit.activity == Activity::Explore && unit.ssa == ServerSideAgent::None {
            unit.ssa = ServerSideAgent::Autoexplore;
        }

        if !orders.has_orders() {
            continue;
        }
        let migrated = activities_to_actions(ruleset, &unit.unit_type, &mut orders.list)
            .and_then(|()| replay_targets(&map, unit.tile, &mut orders));
        if let Err(reason) = migrated {
            warn!("Unit {} of player {}: {reason}; orders cleared", unit.id, unit.owner);
            orders.clear();
            cleared += 1;
        }
    }
    if cleared > 0 {
        info!("Cleared the orders of {cleared} units that could not be migrated");
    }
    Ok(())
}

/// Units that lost plain "Attack" but can still "Suicide Attack" keep
/// their attack orders as suicide attacks.
fn upgrade_attacks(ruleset: &Ruleset, unit_type: &str, list: &mut [UnitOrder]) {
    if ruleset.can_do_action(unit_type, Action::Attack)
        || !ruleset.can_do_action(unit_type, Action::SuicideAttack)
    {
        return;
    }
    for order in list.iter_mut() {
        if order.action == Some(Action::Attack) {
            order.action = Some(Action::SuicideAttack);
        }
    }
}

/// Building sub targets of targeted sabotage moved down by one when
/// production sabotage became its own action. The old lowest value meant
/// "production".
pub(super) fn renumber_sabotage_targets(list: &mut [UnitOrder]) {
    for order in list.iter_mut() {
        let production = match order.action {
            Some(Action::TargetedSabotageCity) => Action::SabotageCityProduction,
            Some(Action::TargetedSabotageCityEscape) => Action::SabotageCityProductionEscape,
            _ => continue,
        };
        if order.sub_target == NO_SUB_TARGET {
            continue;
        }
        order.sub_target = order.sub_target.saturating_sub(1);
        if order.sub_target == NO_SUB_TARGET {
            order.action = Some(production);
        }
    }
}

/// Activity orders for activities that are now started through an action
/// become explicit action orders.
fn activities_to_actions(
    ruleset: &Ruleset,
    unit_type: &str,
    list: &mut [UnitOrder],
) -> Result<(), String> {
    for order in list.iter_mut() {
        if order.order != OrderKind::Activity {
            continue;
        }
        let Some(activity) = order.activity else {
            continue;
        };
        if !Action::ALL
            .iter()
            .any(|a| a.default_activity() == Some(activity))
        {
            continue;
        }
        let Some(action) = ruleset.action_for_activity(unit_type, activity) else {
            return Err(format!(
                "no action lets a {unit_type} start activity {}",
                activity.name()
            ));
        };
        order.order = OrderKind::PerformAction;
        order.action = Some(action);
        order.activity = None;
    }
    Ok(())
}

/// Orders used to aim by direction only. Walk the orders already executed
/// back from the unit's tile to find where the list started, then step
/// forward through every order and record the tile each one targets.
pub(super) fn replay_targets(
    map: &GameMap,
    unit_tile: TileIndex,
    orders: &mut UnitOrders,
) -> Result<(), String> {
    let index = orders.index.min(orders.list.len());

    let mut tile = unit_tile;
    for order in orders.list[..index].iter().rev() {
        if !order.moves_unit() {
            continue;
        }
        if let Some(dir) = order.dir {
            tile = map
                .mapstep(tile, dir.reverse())
                .ok_or_else(|| format!("rewinding past the map edge at tile {tile}"))?;
        }
    }

    let mut targets = Vec::with_capacity(orders.list.len());
    for (i, order) in orders.list.iter().enumerate() {
        if i == index && tile != unit_tile {
            return Err(format!(
                "replay reaches tile {tile} instead of the unit's tile {unit_tile}"
            ));
        }
        let target = match order.dir {
            Some(dir) => map
                .mapstep(tile, dir)
                .ok_or_else(|| format!("order {i} leaves the map at tile {tile}"))?,
            None => tile,
        };
        if order.moves_unit() {
            tile = target;
        }
        targets.push(target);
    }
    if index == orders.list.len() && tile != unit_tile {
        return Err(format!(
            "replay ends at tile {tile} instead of the unit's tile {unit_tile}"
        ));
    }

    for (order, target) in orders.list.iter_mut().zip(targets) {
        order.target = Some(target);
    }
    Ok(())
}
