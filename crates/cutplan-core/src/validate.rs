use crate::config::CuttingConfig;
use crate::error::{CuttingError, Result};
use crate::optimizer::unit_part_count;
use crate::types::{OptimizationInput, PartRequest};
use std::collections::HashSet;

/// Checks the request contract before it reaches the optimizer.
pub fn validate_input(input: &OptimizationInput, config: &CuttingConfig) -> Result<()> {
    if input.parts.is_empty() {
        return Err(CuttingError::InvalidInput(
            "At least one part must be provided".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for part in &input.parts {
        require_text("part", &part.id, "id", &part.id)?;
        require_text("part", &part.id, "color", &part.color)?;
        require_positive("part", &part.id, "length", part.length)?;
        require_positive("part", &part.id, "width", part.width)?;
        require_positive("part", &part.id, "thickness", part.thickness)?;

        if part.quantity == 0 {
            return Err(CuttingError::InvalidInput(format!(
                "Part '{}' must have a quantity of at least 1",
                part.id
            )));
        }
        if !seen.insert(part.id.as_str()) {
            return Err(CuttingError::InvalidInput(format!(
                "Part id '{}' is used more than once",
                part.id
            )));
        }
    }

    check_unit_budget(&input.parts, config)?;

    if input.options.use_infinite_materials {
        return Ok(());
    }

    for material in input.available_materials.iter().flatten() {
        require_text("material", &material.id, "id", &material.id)?;
        require_text("material", &material.id, "color", &material.color)?;
        require_positive("material", &material.id, "length", material.length)?;
        require_positive("material", &material.id, "width", material.width)?;
        require_positive("material", &material.id, "thickness", material.thickness)?;

        if material.available_quantity == 0 {
            return Err(CuttingError::InvalidInput(format!(
                "Material '{}' must have an available quantity of at least 1",
                material.id
            )));
        }
    }

    Ok(())
}

/// Rejects requests that would expand into more unit parts than the config allows.
pub(crate) fn check_unit_budget(parts: &[PartRequest], config: &CuttingConfig) -> Result<()> {
    let total: f64 = parts
        .iter()
        .map(|part| unit_part_count(part, config.max_machine_size))
        .sum();

    if total > config.max_unit_parts as f64 {
        return Err(CuttingError::InvalidInput(format!(
            "Request expands into {} unit parts, the limit is {}",
            total, config.max_unit_parts
        )));
    }
    Ok(())
}

/// Removes parts with a zero length or width; they cannot be cut.
pub fn drop_zero_size_parts(mut input: OptimizationInput) -> OptimizationInput {
    input.parts.retain(|part: &PartRequest| part.length != 0.0 && part.width != 0.0);
    input
}

fn require_text(kind: &str, id: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CuttingError::InvalidInput(format!(
            "{} '{}' has an empty {}",
            kind, id, field
        )));
    }
    Ok(())
}

fn require_positive(kind: &str, id: &str, field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CuttingError::InvalidInput(format!(
            "{} '{}' must have a positive {}, got {}",
            kind, id, field, value
        )));
    }
    Ok(())
}
