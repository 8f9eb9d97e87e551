//! Progression tests: missions, region expansion, research through labs and
//! the tech-gated shop.

use tycoon_core::building::LAB_PORT;
use tycoon_core::config::WorldConfig;
use tycoon_core::error::ActionError;
use tycoon_core::event::{Event, EventKind};
use tycoon_core::fixed::Fixed64;
use tycoon_core::grid::Region;
use tycoon_core::id::Direction;
use tycoon_core::mission::MissionStatus;
use tycoon_core::registry::{BuildingType, ItemType, MissionId, TechId};
use tycoon_core::test_utils::*;

// ===========================================================================
// Missions
// ===========================================================================

#[test]
fn mission_chain_expands_region_twice() {
    let mut world = world_with(&[]);
    let start = world.region();

    give(&mut world, ItemType::Wood, 10);
    give(&mut world, ItemType::IronOre, 5);
    give(&mut world, ItemType::CoalOre, 5);
    assert_eq!(
        world.complete_mission(MissionId::StartUp),
        Err(ActionError::MissionNotReady)
    );
    world.tick();
    assert!(world.missions().alert());
    world.complete_mission(MissionId::StartUp).unwrap();
    assert_eq!(world.money(), Fixed64::from_num(2000));
    assert!(world.player_inventory().is_empty());
    assert_eq!(
        world.missions().available(),
        &[MissionId::Expand1, MissionId::Automation1]
    );

    give(&mut world, ItemType::Wood, 50);
    world.tick();
    world.complete_mission(MissionId::Expand1).unwrap();
    let first = world.region();
    assert_eq!(first, Region::new(start.min_x - 1, start.min_y - 1, start.max_x + 2, start.max_y + 2));
    assert_eq!(world.missions().status(MissionId::Expand2), Some(MissionStatus::Pending));

    give(&mut world, ItemType::IronGear, 50);
    give(&mut world, ItemType::CopperIngot, 50);
    world.tick();
    world.complete_mission(MissionId::Expand2).unwrap();
    assert_eq!(world.region().width(), start.width() + 6);

    let kinds: Vec<_> = world.drain_events().iter().map(Event::kind).collect();
    assert_eq!(kinds.iter().filter(|k| **k == EventKind::RegionExpanded).count(), 2);
    assert_eq!(kinds.iter().filter(|k| **k == EventKind::MissionCompleted).count(), 3);
}

#[test]
fn mission_ready_survives_spending() {
    let mut world = world_with(&[(ItemType::Wood, 10), (ItemType::IronOre, 5), (ItemType::CoalOre, 5)]);
    world.tick();
    world.player_inventory_mut().remove_item(ItemType::Wood, 1);
    world.tick();
    assert_eq!(world.missions().status(MissionId::StartUp), Some(MissionStatus::Ready));
    // Handing in still needs the items.
    assert_eq!(
        world.complete_mission(MissionId::StartUp),
        Err(ActionError::MissingItems)
    );
}

#[test]
fn expansion_unlocks_placement() {
    let mut world = world_with(&[(ItemType::Wood, 60), (ItemType::IronOre, 5), (ItemType::CoalOre, 5)]);
    let r = world.region();
    let (x, y) = (r.min_x - 1, r.min_y - 1);
    assert_eq!(
        world.place_building(BuildingType::Conveyor, x, y, Direction::Right),
        Err(ActionError::Locked)
    );
    assert!(!world.can_place_building(x, y, 1, 1));

    world.tick();
    world.complete_mission(MissionId::StartUp).unwrap();
    world.tick();
    world.complete_mission(MissionId::Expand1).unwrap();
    assert!(world.can_place_building(x, y, 1, 1));
    place(&mut world, BuildingType::Conveyor, x, y, Direction::Right);
}

#[test]
fn expansion_clamps_to_grid() {
    let mut world = build(WorldConfig {
        grid_width: 10,
        grid_height: 10,
        start_size: 9,
        starting_items: vec![(ItemType::Wood, 60), (ItemType::IronOre, 5), (ItemType::CoalOre, 5)],
        ..test_config()
    });
    world.tick();
    world.complete_mission(MissionId::StartUp).unwrap();
    world.tick();
    world.complete_mission(MissionId::Expand1).unwrap();
    assert_eq!(world.region(), Region::new(0, 0, 10, 10));
}

// ===========================================================================
// Research
// ===========================================================================

#[test]
fn lab_research_unlocks_shop_item() {
    let mut world = empty_world();
    let (x, y) = region_origin(&world);
    let lab = place(&mut world, BuildingType::Lab, x, y, Direction::Right);
    assert_eq!(
        world.buy_item(ItemType::FastConveyor),
        Err(ActionError::TechLocked(TechId::Logistics))
    );

    world.request_research(TechId::Logistics).unwrap();
    assert!(stock(&mut world, lab, LAB_PORT, ItemType::SciencePack, 10));
    world.drain_events();

    run(&mut world, 600);
    assert_eq!(world.research().progress(), 10);
    assert!(!world.research().is_unlocked(TechId::Logistics));
    run(&mut world, 1);
    assert!(world.research().is_unlocked(TechId::Logistics));
    assert_eq!(world.research().current(), None);
    assert!(
        world
            .drain_events()
            .iter()
            .any(|e| matches!(e, Event::ResearchCompleted { tech: TechId::Logistics, .. }))
    );

    world.buy_item(ItemType::FastConveyor).unwrap();
    assert_eq!(world.player_inventory().count_items(ItemType::FastConveyor), 1);
}

#[test]
fn research_tree_respects_prerequisites() {
    let mut world = empty_world();
    assert_eq!(
        world.request_research(TechId::Mining),
        Err(ActionError::PrerequisiteMissing)
    );
    world.request_research(TechId::Logistics).unwrap();
    assert_eq!(
        world.request_research(TechId::Logistics),
        Err(ActionError::AlreadyResearching)
    );
    world.complete_research();
    assert_eq!(
        world.request_research(TechId::Logistics),
        Err(ActionError::AlreadyUnlocked)
    );
    world.request_research(TechId::Mining).unwrap();
    world.complete_research();
    world.buy_item(ItemType::HeavyMiner).unwrap();
}

#[test]
fn belt_delivers_science_packs_to_lab() {
    let mut world = empty_world();
    let (x, y) = region_origin(&world);
    place(&mut world, BuildingType::Conveyor, x, y, Direction::Right);
    let lab = place(&mut world, BuildingType::Lab, x + 1, y, Direction::Right);
    spawn(&mut world, ItemType::SciencePack, x, y);
    spawn(&mut world, ItemType::IronOre, x, y);
    run(&mut world, 11);
    assert_eq!(building_count(&world, lab, ItemType::SciencePack), 1);
    assert_eq!(world.items().len(), 1);
}

#[test]
fn lab_idles_without_packs() {
    let mut world = empty_world();
    let (x, y) = region_origin(&world);
    place(&mut world, BuildingType::Lab, x, y, Direction::Right);
    world.start_research(TechId::Logistics).unwrap();
    run(&mut world, 500);
    assert_eq!(world.research().progress(), 0);
}

// ===========================================================================
// Economy
// ===========================================================================

#[test]
fn upgrades_pay_passive_income() {
    let mut world = world_with(&[]);
    world.buy_item(ItemType::Sponsorship).unwrap();
    assert_eq!(world.money(), Fixed64::from_num(500));
    run(&mut world, 60 * 5);
    // 1/60 per tick is not exact in Q32.32.
    let drift = (world.money() - Fixed64::from_num(505)).abs();
    assert!(drift < Fixed64::from_num(0.001), "money {}", world.money());
    assert_eq!(
        world.buy_item(ItemType::Sponsorship),
        Err(ActionError::AlreadyPurchased)
    );
    assert!(world.purchased_upgrades().contains(&ItemType::Sponsorship));
}

#[test]
fn insufficient_funds_leaves_world_unchanged() {
    let mut world = world_with(&[]);
    let before = world.state_hash();
    assert_eq!(
        world.buy_item(ItemType::Partnership),
        Err(ActionError::InsufficientFunds)
    );
    assert_eq!(world.state_hash(), before);
}
