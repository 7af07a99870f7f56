use super::*;
use crate::config::INFINITE_MATERIAL_LENGTH;
use crate::error::CuttingError;

fn part(id: &str, length: f64, width: f64, quantity: u32, can_rotate: bool) -> PartRequest {
    PartRequest {
        id: id.to_string(),
        length,
        width,
        color: "9003".to_string(),
        thickness: 0.45,
        quantity,
        can_rotate,
        label: String::new(),
        description: format!("part {}", id),
    }
}

fn material(id: &str, length: f64, width: f64, available_quantity: u32) -> MaterialSheet {
    MaterialSheet {
        id: id.to_string(),
        length,
        width,
        color: "9003".to_string(),
        thickness: 0.45,
        available_quantity,
    }
}

fn infinite_request(parts: Vec<PartRequest>) -> OptimizationInput {
    OptimizationInput {
        parts,
        available_materials: None,
        options: OptimizationOptions {
            use_infinite_materials: true,
            ..OptimizationOptions::default()
        },
    }
}

fn stock_request(parts: Vec<PartRequest>, materials: Vec<MaterialSheet>) -> OptimizationInput {
    OptimizationInput {
        parts,
        available_materials: Some(materials),
        options: OptimizationOptions::default(),
    }
}

fn placed_count(result: &OptimizationResult) -> usize {
    result.sheets.iter().map(|s| s.parts.len()).sum()
}

#[test]
fn test_expand_parts_by_quantity() {
    let optimizer = CuttingOptimizer::default();
    let expanded = optimizer.expand_parts(&[part("1", 1000.0, 500.0, 3, true)]);

    let ids: Vec<_> = expanded.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1_0", "1_1", "1_2"]);
    assert!(expanded.iter().all(|p| p.split_group_id.is_none()));
    assert!(expanded.iter().all(|p| p.original_id == "1"));
}

#[test]
fn test_expand_splits_oversized_parts() {
    let optimizer = CuttingOptimizer::default();
    let expanded = optimizer.expand_parts(&[part("1", 7000.0, 500.0, 1, false)]);

    assert_eq!(expanded.len(), 3);
    for unit in &expanded {
        assert_eq!(unit.length, 2334.0);
        assert_eq!(unit.width, 500.0);
        assert_eq!(unit.split_group_id.as_deref(), Some("1"));
        assert!(!unit.can_rotate);
    }
    assert_eq!(expanded[0].id, "1_0_0");
    assert_eq!(expanded[2].id, "1_0_2");
}

#[test]
fn test_expand_splits_every_copy() {
    let optimizer = CuttingOptimizer::default();
    let expanded = optimizer.expand_parts(&[part("long", 6500.0, 300.0, 2, true)]);

    assert_eq!(expanded.len(), 6);
    let ids: Vec<_> = expanded.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["long_0_0", "long_0_1", "long_0_2", "long_1_0", "long_1_1", "long_1_2"]
    );
}

#[test]
fn test_zero_quantity_yields_no_parts() {
    let optimizer = CuttingOptimizer::default();
    assert!(optimizer.expand_parts(&[part("1", 100.0, 100.0, 0, true)]).is_empty());

    let result = CuttingOptimizer::default()
        .optimize_cutting(&infinite_request(vec![part("1", 100.0, 100.0, 0, true)]))
        .unwrap();
    assert!(result.sheets.is_empty());
    assert!(result.is_complete);
}

#[test]
fn test_group_parts_by_color_and_thickness() {
    let optimizer = CuttingOptimizer::default();
    let mut other = part("3", 1000.0, 500.0, 1, true);
    other.color = "9006".to_string();
    other.thickness = 0.5;
    let units = optimizer.expand_parts(&[
        part("1", 1000.0, 500.0, 1, true),
        part("2", 1000.0, 500.0, 1, true),
        other,
    ]);

    let groups = group_parts(units);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key.color, "9003");
    assert_eq!(groups[0].parts.len(), 2);
    assert_eq!(groups[1].key, MaterialKey { color: "9006".to_string(), thickness: 0.5 });
    assert_eq!(groups[1].parts.len(), 1);
}

#[test]
fn test_grouping_membership_ignores_input_order() {
    let optimizer = CuttingOptimizer::default();
    let mut red = part("r", 300.0, 200.0, 2, true);
    red.color = "3000".to_string();
    let units = optimizer.expand_parts(&[part("a", 100.0, 100.0, 2, true), red, part("b", 50.0, 50.0, 1, true)]);
    let mut reversed = units.clone();
    reversed.reverse();

    let membership = |groups: Vec<PartGroup>| {
        let mut sets: Vec<(String, Vec<String>)> = groups
            .into_iter()
            .map(|g| {
                let mut ids: Vec<String> = g.parts.into_iter().map(|p| p.id).collect();
                ids.sort();
                (g.key.color, ids)
            })
            .collect();
        sets.sort();
        sets
    };

    assert_eq!(membership(group_parts(units)), membership(group_parts(reversed)));
}

#[test]
fn test_infinite_material_properties() {
    let optimizer = CuttingOptimizer::default();
    let key = MaterialKey {
        color: "9003".to_string(),
        thickness: 0.45,
    };
    let options = OptimizationOptions {
        use_infinite_materials: true,
        ..OptimizationOptions::default()
    };

    let materials = optimizer.select_materials(&key, None, &options);
    assert_eq!(materials.len(), 1);
    assert_eq!(materials[0].length, INFINITE_MATERIAL_LENGTH);
    assert_eq!(materials[0].width, 1250.0);
    assert_eq!(materials[0].color, "9003");
    assert_eq!(materials[0].thickness, 0.45);
    assert_eq!(materials[0].available_quantity, 1);
}

#[test]
fn test_filter_materials_by_exact_properties() {
    let optimizer = CuttingOptimizer::default();
    let mut wrong_color = material("2", 5000.0, 1250.0, 5);
    wrong_color.color = "9006".to_string();
    let mut wrong_thickness = material("3", 5000.0, 1250.0, 3);
    wrong_thickness.thickness = 0.5;
    let stock = vec![material("1", 5000.0, 1250.0, 10), wrong_color, wrong_thickness];

    let key = MaterialKey {
        color: "9003".to_string(),
        thickness: 0.45,
    };
    let filtered = optimizer.select_materials(&key, Some(&stock), &OptimizationOptions::default());
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, "1");

    assert!(optimizer
        .select_materials(&key, None, &OptimizationOptions::default())
        .is_empty());
}

#[test]
fn test_plan_section_sizes_to_longest_fitting_part() {
    let optimizer = CuttingOptimizer::default();
    let units = optimizer.expand_parts(&[
        part("short", 800.0, 300.0, 1, true),
        part("wide", 1500.0, 1400.0, 1, true),
        part("long", 400.0, 2100.0, 1, true),
    ]);

    let plan = plan_section(&units, 1250.0, 3000.0).unwrap();
    assert_eq!(plan.length, 2100.0);
    let ids: Vec<_> = plan.parts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["long_0", "short_0"]);

    // Usable length shorter than every qualifying part
    assert!(plan_section(&units, 1250.0, 200.0).is_none());
    assert!(plan_section(&[], 1250.0, 3000.0).is_none());
}

#[test]
fn test_plan_section_turns_parts_across_wide_sheets() {
    let optimizer = CuttingOptimizer::default();
    let units = optimizer.expand_parts(&[
        part("turnable", 1500.0, 500.0, 1, true),
        part("fixed", 1500.0, 500.0, 1, false),
    ]);

    let plan = plan_section(&units, 2000.0, 1000.0).unwrap();
    assert_eq!(plan.length, 500.0);
    let ids: Vec<_> = plan.parts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["turnable_0"]);
}

#[test]
fn test_short_wide_sheet_takes_turned_part() {
    let mut optimizer = CuttingOptimizer::default();
    let request = stock_request(
        vec![part("p", 1500.0, 500.0, 1, true)],
        vec![material("m", 1000.0, 2000.0, 1)],
    );
    let result = optimizer.optimize_cutting(&request).unwrap();

    assert!(result.is_complete);
    assert_eq!(result.sheets.len(), 1);
    let sheet = &result.sheets[0];
    assert_eq!(sheet.length, 500.0);
    let placed = &sheet.parts[0];
    assert!(placed.rotated);
    assert_eq!((placed.length, placed.width), (500.0, 1500.0));

    let stiff = stock_request(
        vec![part("p", 1500.0, 500.0, 1, false)],
        vec![material("m", 1000.0, 2000.0, 1)],
    );
    let result = optimizer.optimize_cutting(&stiff).unwrap();
    assert!(result.sheets.is_empty());
    assert_eq!(result.unplaced_parts[0].reason, UnplacedReason::NoMatchingMaterial);
}

#[test]
fn test_oversized_request_is_rejected_before_expansion() {
    let mut optimizer = CuttingOptimizer::new(CuttingConfig {
        max_unit_parts: 10,
        ..CuttingConfig::default()
    });

    let err = optimizer
        .optimize_cutting(&infinite_request(vec![part("ridge", 3.0e12, 150.0, 1, true)]))
        .unwrap_err();
    assert!(matches!(err, CuttingError::InvalidInput(_)));

    let result = optimizer
        .optimize_cutting(&infinite_request(vec![part("p", 500.0, 500.0, 10, true)]))
        .unwrap();
    assert!(result.is_complete);
}

#[test]
fn test_calculate_utilization_rate() {
    let sheet = SheetResult {
        id: "m_0".to_string(),
        material_id: "m".to_string(),
        sheet_number: 1,
        offset: 0.0,
        length: 2000.0,
        width: 1000.0,
        color: "9003".to_string(),
        thickness: 0.45,
        parts: vec![PlacedPart {
            id: "1_0".to_string(),
            length: 1000.0,
            width: 500.0,
            x: 0.0,
            y: 0.0,
            square: 500000.0,
            rotated: false,
            color: "9003".to_string(),
            thickness: 0.45,
            label: "Part".to_string(),
            description: "Test".to_string(),
            original_id: "1".to_string(),
            split_group_id: None,
        }],
        waste: SheetWaste {
            square: 1500000.0,
            utilization_rate: 25.0,
        },
    };

    assert_eq!(calculate_utilization_rate(&[sheet]), 25.0);
    assert_eq!(calculate_utilization_rate(&[]), 0.0);
}

#[test]
fn test_simple_optimization_on_infinite_material() {
    let mut optimizer = CuttingOptimizer::default();
    let result = optimizer
        .optimize_cutting(&infinite_request(vec![part("1", 1000.0, 500.0, 2, true)]))
        .unwrap();

    assert_eq!(result.sheets.len(), 1);
    assert!(result.is_complete);
    let sheet = &result.sheets[0];
    assert_eq!(sheet.length, 1000.0);
    assert_eq!(sheet.width, 1250.0);
    assert_eq!(sheet.parts.len(), 2);
    assert_eq!((sheet.parts[0].x, sheet.parts[0].y), (0.0, 0.0));
    assert_eq!((sheet.parts[1].x, sheet.parts[1].y), (0.0, 500.0));
    assert!((result.utilization_rate - 80.0).abs() < 1e-9);
    assert_eq!(result.total_material_area, 1_250_000.0);
    assert_eq!(result.total_waste, 250_000.0);
}

#[test]
fn test_finite_stock_moves_to_next_sheet_copy() {
    let mut optimizer = CuttingOptimizer::default();
    let request = stock_request(
        vec![part("p", 1000.0, 1000.0, 4, false)],
        vec![material("m", 2000.0, 1000.0, 2)],
    );
    let result = optimizer.optimize_cutting(&request).unwrap();

    assert!(result.is_complete);
    assert_eq!(result.sheets.len(), 4);
    let positions: Vec<_> = result
        .sheets
        .iter()
        .map(|s| (s.sheet_number, s.offset))
        .collect();
    assert_eq!(positions, vec![(1, 0.0), (1, 1000.0), (2, 0.0), (2, 1000.0)]);
    let ids: Vec<_> = result.sheets.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["m_0", "m_1", "m_2", "m_3"]);
    assert_eq!(result.materials_required.get("m"), Some(&2));
}

#[test]
fn test_exhausted_stock_reports_leftovers() {
    let mut optimizer = CuttingOptimizer::default();
    let request = stock_request(
        vec![part("p", 1000.0, 1000.0, 4, false)],
        vec![material("m", 2000.0, 1000.0, 1)],
    );
    let result = optimizer.optimize_cutting(&request).unwrap();

    assert!(!result.is_complete);
    assert_eq!(placed_count(&result), 2);
    assert_eq!(result.unplaced_parts.len(), 1);
    let info = &result.unplaced_parts[0];
    assert_eq!(info.id, "p");
    assert_eq!(info.quantity, 2);
    assert_eq!(info.square, 2_000_000.0);
    assert_eq!(info.reason, UnplacedReason::NoMatchingMaterial);
}

#[test]
fn test_later_materials_take_over() {
    let mut optimizer = CuttingOptimizer::default();
    let request = stock_request(
        vec![part("p", 1000.0, 1000.0, 3, false)],
        vec![material("small", 1000.0, 1000.0, 1), material("big", 3000.0, 1000.0, 1)],
    );
    let result = optimizer.optimize_cutting(&request).unwrap();

    assert!(result.is_complete);
    let materials: Vec<_> = result.sheets.iter().map(|s| s.material_id.as_str()).collect();
    assert_eq!(materials, vec!["small", "big", "big"]);
}

#[test]
fn test_part_that_never_fits_does_not_loop() {
    let mut optimizer = CuttingOptimizer::default();
    // Only fits the 1250 wide roll when turned, which is not allowed
    let result = optimizer
        .optimize_cutting(&infinite_request(vec![part("stiff", 200.0, 1300.0, 1, false)]))
        .unwrap();

    assert!(result.sheets.is_empty());
    assert_eq!(result.unplaced_parts.len(), 1);
    assert_eq!(result.unplaced_parts[0].reason, UnplacedReason::NoMatchingMaterial);
}

#[test]
fn test_width_beyond_machine_is_reported() {
    let mut optimizer = CuttingOptimizer::default();
    let result = optimizer
        .optimize_cutting(&infinite_request(vec![part("wide", 500.0, 3500.0, 1, true)]))
        .unwrap();

    assert!(!result.is_complete);
    let info = &result.unplaced_parts[0];
    assert_eq!(info.reason, UnplacedReason::ExceedsMachineDimensions);
    assert_eq!(info.message, "exceeds machine dimensions");
}

#[test]
fn test_waste_is_broken_down_by_material() {
    let mut optimizer = CuttingOptimizer::default();
    let mut dark = part("dark", 1000.0, 500.0, 1, true);
    dark.color = "7016".to_string();
    let result = optimizer
        .optimize_cutting(&infinite_request(vec![
            part("light", 1000.0, 500.0, 1, true),
            dark,
        ]))
        .unwrap();

    assert_eq!(result.waste.len(), 2);
    assert_eq!(result.waste[0].color, "9003");
    assert_eq!(result.waste[1].color, "7016");
    let sum: f64 = result.waste.iter().map(|w| w.square).sum();
    assert_eq!(sum, result.total_waste);
    assert!(result.sheets.iter().all(|s| s.parts.iter().all(|p| p.color == s.color)));
}

#[test]
fn test_first_fit_still_places_everything() {
    let mut optimizer = CuttingOptimizer::default();
    let mut request = infinite_request(vec![
        part("a", 1200.0, 400.0, 3, true),
        part("b", 600.0, 300.0, 5, true),
    ]);
    request.options.smart_pack = false;
    let result = optimizer.optimize_cutting(&request).unwrap();

    assert!(result.is_complete);
    assert_eq!(placed_count(&result), 8);
}

#[test]
fn test_packer_cache_is_bounded_and_optional() {
    let request = stock_request(
        vec![part("p", 1000.0, 1000.0, 4, false)],
        vec![material("m", 2000.0, 1000.0, 2)],
    );

    let mut bounded = CuttingOptimizer::new(CuttingConfig {
        packer_cache_capacity: 2,
        ..CuttingConfig::default()
    });
    let first = bounded.optimize_cutting(&request).unwrap();
    let second = bounded.optimize_cutting(&request).unwrap();
    assert!(bounded.cached_packer_options() <= 2);
    assert_eq!(first, second);

    let mut uncached = CuttingOptimizer::new(CuttingConfig {
        packer_cache_capacity: 0,
        ..CuttingConfig::default()
    });
    assert_eq!(uncached.optimize_cutting(&request).unwrap(), first);
    assert_eq!(uncached.cached_packer_options(), 0);
}

#[test]
fn test_cache_evicts_oldest_entry() {
    let mut cache = PackerOptionsCache::new(1);
    let options = |width| PackerOptions {
        width,
        height: 1250.0,
        padding: 0.0,
        heuristic: crate::packer::FitHeuristic::BestAreaFit,
    };

    cache.get_or_insert_with("a", 100.0, 1250.0, true, || options(100.0));
    let hit = cache.get_or_insert_with("a", 100.0, 1250.0, true, || options(999.0));
    assert_eq!(hit.width, 100.0);

    cache.get_or_insert_with("b", 200.0, 1250.0, true, || options(200.0));
    assert_eq!(cache.len(), 1);
    let recomputed = cache.get_or_insert_with("a", 100.0, 1250.0, true, || options(300.0));
    assert_eq!(recomputed.width, 300.0);
}
