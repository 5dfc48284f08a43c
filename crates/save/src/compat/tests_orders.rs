//! Post-load migration of unit orders.

use game::config::NO_SUB_TARGET;
use game::map::Topology;
use game::unit::{OrderKind, Unit, UnitOrder, UnitOrders};
use game::{Action, Activity, Direction8, GameMap, Ruleset, ServerSideAgent};

use super::*;
use crate::doc_path;
use crate::document::{Document, Value};
use crate::load_pipeline::{load_savegame, upgrade_document};
use crate::load_session::LoadOptions;
use crate::test_fixtures::{minimal_document, set_unit_orders, MAP_HEIGHT, MAP_WIDTH};

/// Tile of the fixture unit, (3, 2).
const UNIT_TILE: usize = 2 * MAP_WIDTH + 3;

fn load_unit(doc: Document) -> (Unit, UnitOrders) {
    let mut loaded = load_savegame(doc, &Ruleset::classic(), LoadOptions::default()).unwrap();
    let world = &mut loaded.world;
    let (unit, orders) = world.query::<(&Unit, &UnitOrders)>().single(world);
    (unit.clone(), orders.clone())
}

fn doc_with_orders(
    unit_type: &str,
    orders: &str,
    dirs: &str,
    activities: &str,
    actions: Vec<i64>,
) -> Document {
    let mut doc = minimal_document(50);
    doc.replace(&doc_path::unit(0, 0, "type"), unit_type);
    set_unit_orders(&mut doc, 0, 0, orders, dirs, activities, actions);
    doc
}

fn savegame3(mut doc: Document) -> Document {
    doc.replace(&doc_path::savefile("options"), "+version3");
    doc
}

#[test]
fn test_mine_activity_order_becomes_build_mine() {
    let doc = doc_with_orders("Workers", "x", "?", "m", vec![-1]);
    let (_, orders) = load_unit(doc);
    assert_eq!(
        orders.list,
        vec![UnitOrder::perform(Action::BuildMine, Some(UNIT_TILE))]
    );
}

#[test]
fn test_activity_without_an_action_is_kept() {
    let doc = doc_with_orders("Workers", "x", "?", "s", vec![-1]);
    let (_, orders) = load_unit(doc);
    assert_eq!(orders.list[0].order, OrderKind::Activity);
    assert_eq!(orders.list[0].activity, Some(Activity::Sentry));
}

#[test]
fn test_orders_cleared_when_unit_cannot_start_the_activity() {
    let doc = doc_with_orders("Warriors", "mx", "4?", "?m", vec![-1, -1]);
    let (unit, orders) = load_unit(doc);
    assert!(!orders.has_orders());
    assert_eq!(orders, UnitOrders::default());
    assert_eq!(unit.tile, UNIT_TILE);
}

#[test]
fn test_savegame3_attack_becomes_suicide_attack() {
    let doc = savegame3(doc_with_orders(
        "Cruise Missile",
        "p",
        "4",
        "?",
        vec![Action::Attack as i64],
    ));
    let (_, orders) = load_unit(doc);
    assert_eq!(orders.list[0].action, Some(Action::SuicideAttack));
    assert_eq!(orders.list[0].target, Some(UNIT_TILE + 1));
}

#[test]
fn test_savegame2_attack_is_left_alone() {
    let doc = doc_with_orders("Cruise Missile", "p", "4", "?", vec![Action::Attack as i64]);
    let (_, orders) = load_unit(doc);
    assert_eq!(orders.list[0].action, Some(Action::Attack));
}

#[test]
fn test_units_that_can_attack_keep_attack() {
    let doc = savegame3(doc_with_orders(
        "Warriors",
        "p",
        "4",
        "?",
        vec![Action::Attack as i64],
    ));
    let (_, orders) = load_unit(doc);
    assert_eq!(orders.list[0].action, Some(Action::Attack));
}

#[test]
fn test_sabotage_targets_move_down() {
    let targeted = Action::TargetedSabotageCity as i64;
    let mut doc = savegame3(doc_with_orders(
        "Diplomat",
        "pp",
        "4?",
        "??",
        vec![targeted, targeted],
    ));
    doc.replace(&doc_path::unit(0, 0, "tgt_vec"), Value::IntVec(vec![0, 4]));

    let (_, orders) = load_unit(doc);
    assert_eq!(orders.list[0].action, Some(Action::SabotageCityProduction));
    assert_eq!(orders.list[0].sub_target, NO_SUB_TARGET);
    assert_eq!(orders.list[1].action, Some(Action::TargetedSabotageCity));
    assert_eq!(orders.list[1].sub_target, 3);
}

#[test]
fn test_sabotage_without_sub_target_is_left_alone() {
    let doc = savegame3(doc_with_orders(
        "Diplomat",
        "p",
        "4",
        "?",
        vec![Action::TargetedSabotageCity as i64],
    ));

    let (_, orders) = load_unit(doc);
    assert_eq!(orders.list[0].action, Some(Action::TargetedSabotageCity));
    assert_eq!(orders.list[0].sub_target, NO_SUB_TARGET);
}

#[test]
fn test_sabotage_renumbering_saturates() {
    let mut lowest = UnitOrder::perform(Action::TargetedSabotageCityEscape, None);
    lowest.sub_target = i64::MIN;
    let mut unset = UnitOrder::perform(Action::TargetedSabotageCity, None);
    unset.sub_target = NO_SUB_TARGET;
    let mut list = vec![lowest, unset];

    post_load::renumber_sabotage_targets(&mut list);
    assert_eq!(list[0].sub_target, i64::MIN);
    assert_eq!(list[0].action, Some(Action::TargetedSabotageCityEscape));
    assert_eq!(list[1].sub_target, NO_SUB_TARGET);
    assert_eq!(list[1].action, Some(Action::TargetedSabotageCity));
}

#[test]
fn test_escape_sabotage_becomes_escape_production() {
    let mut doc = savegame3(doc_with_orders(
        "Spy",
        "p",
        "4",
        "?",
        vec![Action::TargetedSabotageCityEscape as i64],
    ));
    doc.replace(&doc_path::unit(0, 0, "tgt_vec"), Value::IntVec(vec![0]));

    let (_, orders) = load_unit(doc);
    assert_eq!(
        orders.list[0].action,
        Some(Action::SabotageCityProductionEscape)
    );
}

#[test]
fn test_exploring_units_get_autoexplore() {
    let mut doc = minimal_document(50);
    doc.replace(&doc_path::unit(0, 0, "activity"), "Explore");
    let (unit, _) = load_unit(doc);
    assert_eq!(unit.activity, Activity::Explore);
    assert_eq!(unit.ssa, ServerSideAgent::Autoexplore);
}

#[test]
fn test_current_saves_skip_order_fixups() {
    let mut doc = minimal_document(CURRENT_COMPAT_VERSION);
    doc.replace(&doc_path::unit(0, 0, "activity"), "Explore");
    set_unit_orders(&mut doc, 0, 0, "x", "?", "m", vec![-1]);
    let (unit, orders) = load_unit(doc);
    assert_eq!(unit.ssa, ServerSideAgent::None);
    assert_eq!(orders.list[0].order, OrderKind::Activity);
    assert_eq!(orders.list[0].target, None);
}

#[test]
fn test_partly_executed_orders_get_targets() {
    let mut doc = doc_with_orders("Workers", "mm", "44", "??", vec![-1, -1]);
    doc.replace(&doc_path::unit(0, 0, "orders_index"), 1);

    let (_, orders) = load_unit(doc);
    assert_eq!(orders.index, 1);
    let targets: Vec<_> = orders.list.iter().map(|o| o.target).collect();
    assert_eq!(targets, vec![Some(UNIT_TILE), Some(UNIT_TILE + 1)]);
}

#[test]
fn test_orders_leaving_the_map_are_cleared() {
    // The fixture map wraps east-west only.
    let doc = doc_with_orders("Workers", "mmm", "111", "???", vec![-1, -1, -1]);
    let (_, orders) = load_unit(doc);
    assert!(!orders.has_orders());
}

#[test]
fn test_orders_wrap_around_the_map() {
    let mut doc = minimal_document(50);
    doc.replace(&doc_path::unit(0, 0, "x"), MAP_WIDTH - 1);
    set_unit_orders(&mut doc, 0, 0, "m", "4", "?", vec![-1]);
    let (_, orders) = load_unit(doc);
    assert_eq!(orders.list[0].target, Some(2 * MAP_WIDTH));
}

#[test]
fn test_upgraded_document_loads_like_the_original() {
    let mut exploring = minimal_document(50);
    exploring.replace(&doc_path::unit(0, 0, "activity"), "Explore");
    let mut sabotage = savegame3(doc_with_orders(
        "Diplomat",
        "p",
        "4",
        "?",
        vec![Action::TargetedSabotageCity as i64],
    ));
    sabotage.replace(&doc_path::unit(0, 0, "tgt_vec"), Value::IntVec(vec![0]));

    let docs = [
        doc_with_orders("Workers", "x", "?", "m", vec![-1]),
        doc_with_orders("Workers", "mm", "44", "??", vec![-1, -1]),
        savegame3(doc_with_orders(
            "Cruise Missile",
            "p",
            "4",
            "?",
            vec![Action::Attack as i64],
        )),
        sabotage,
        exploring,
    ];
    for doc in docs {
        let (upgraded, _) =
            upgrade_document(doc.clone(), &Ruleset::classic(), LoadOptions::default()).unwrap();
        assert_eq!(load_unit(upgraded), load_unit(doc));
    }
}

// =============================================================================
// replay_targets
// =============================================================================

fn plain_map() -> GameMap {
    GameMap::new(MAP_WIDTH, MAP_HEIGHT)
}

fn step(order: OrderKind, dir: Option<Direction8>) -> UnitOrder {
    UnitOrder {
        dir,
        ..UnitOrder::new(order)
    }
}

fn orders(list: Vec<UnitOrder>, index: usize) -> UnitOrders {
    UnitOrders {
        list,
        index,
        ..Default::default()
    }
}

#[test]
fn test_replay_from_the_start() {
    let map = plain_map();
    let start = map.tile_index(1, 1).unwrap();
    let mut orders = orders(
        vec![
            step(OrderKind::Move, Some(Direction8::South)),
            step(OrderKind::FullMp, None),
            step(OrderKind::Move, Some(Direction8::East)),
        ],
        0,
    );

    post_load::replay_targets(&map, start, &mut orders).unwrap();
    let targets: Vec<_> = orders.list.iter().map(|o| o.target).collect();
    assert_eq!(
        targets,
        vec![map.tile_index(1, 2), map.tile_index(1, 2), map.tile_index(2, 2)]
    );
}

#[test]
fn test_replay_of_finished_orders_ends_on_the_unit() {
    let map = plain_map();
    let unit_tile = map.tile_index(3, 3).unwrap();
    let mut orders = orders(
        vec![
            step(OrderKind::Move, Some(Direction8::SouthEast)),
            step(OrderKind::ActionMove, Some(Direction8::SouthEast)),
        ],
        2,
    );

    post_load::replay_targets(&map, unit_tile, &mut orders).unwrap();
    assert_eq!(orders.list[0].target, map.tile_index(2, 2));
    assert_eq!(orders.list[1].target, Some(unit_tile));
}

#[test]
fn test_non_moving_actions_do_not_advance_the_replay() {
    let map = plain_map();
    let unit_tile = map.tile_index(2, 2).unwrap();
    let mut attack = UnitOrder::perform(Action::Attack, None);
    attack.dir = Some(Direction8::North);
    let mut orders = orders(
        vec![attack, step(OrderKind::Move, Some(Direction8::West))],
        1,
    );

    post_load::replay_targets(&map, unit_tile, &mut orders).unwrap();
    assert_eq!(orders.list[0].target, map.tile_index(2, 1));
    assert_eq!(orders.list[1].target, map.tile_index(1, 2));
}

#[test]
fn test_rewinding_past_the_edge_fails() {
    let map = plain_map();
    let mut orders = orders(vec![step(OrderKind::Move, Some(Direction8::East))], 1);
    let before = orders.clone();

    assert!(post_load::replay_targets(&map, 0, &mut orders).is_err());
    assert_eq!(orders, before);
}

#[test]
fn test_invalid_hex_direction_fails() {
    let mut map = plain_map();
    map.topology = Topology {
        iso: false,
        hex: true,
    };
    let mut orders = orders(vec![step(OrderKind::Move, Some(Direction8::NorthWest))], 0);
    let tile = map.tile_index(2, 2).unwrap();

    assert!(post_load::replay_targets(&map, tile, &mut orders).is_err());
    assert!(orders.list.iter().all(|o| o.target.is_none()));
}
