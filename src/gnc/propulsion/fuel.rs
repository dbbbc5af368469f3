use crate::config::spacecraft::SpacecraftProperties;
use serde::Serialize;

/// Single propellant pool shared by every thruster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelState {
    dry_mass: f64,
    fuel_mass: f64,
    max_fuel_mass: f64,
}

impl FuelState {
    pub fn new(dry_mass: f64, fuel_mass: f64, max_fuel_mass: f64) -> Self {
        let max_fuel_mass = max_fuel_mass.max(0.0);
        Self {
            dry_mass,
            fuel_mass: fuel_mass.clamp(0.0, max_fuel_mass),
            max_fuel_mass,
        }
    }

    pub fn from_properties(properties: &SpacecraftProperties) -> Self {
        Self::new(
            properties.dry_mass,
            properties.fuel_mass,
            properties.max_fuel_mass,
        )
    }

    pub fn dry_mass(&self) -> f64 {
        self.dry_mass
    }

    pub fn fuel_mass(&self) -> f64 {
        self.fuel_mass
    }

    pub fn max_fuel_mass(&self) -> f64 {
        self.max_fuel_mass
    }

    pub fn total_mass(&self) -> f64 {
        self.dry_mass + self.fuel_mass
    }

    pub fn fraction_remaining(&self) -> f64 {
        if self.max_fuel_mass > 0.0 {
            self.fuel_mass / self.max_fuel_mass
        } else {
            0.0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fuel_mass <= 0.0
    }

    /// Draws up to `mass` kg from the tank and returns what was actually drawn.
    pub fn consume(&mut self, mass: f64) -> f64 {
        if mass.is_nan() || mass <= 0.0 {
            return 0.0;
        }
        let drawn = mass.min(self.fuel_mass);
        self.fuel_mass = (self.fuel_mass - drawn).max(0.0);
        drawn
    }

    /// Refills the tank.
    pub fn reset(&mut self) {
        self.fuel_mass = self.max_fuel_mass;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn consumption_clamps_at_zero() {
        let mut fuel = FuelState::new(100.0, 1.0, 5.0);
        assert_relative_eq!(fuel.consume(0.4), 0.4);
        assert_relative_eq!(fuel.consume(2.0), 0.6);
        assert!(fuel.is_empty());
        assert_eq!(fuel.consume(1.0), 0.0);
        assert_eq!(fuel.total_mass(), 100.0);
    }

    #[test]
    fn negative_or_nan_draw_is_ignored() {
        let mut fuel = FuelState::new(100.0, 1.0, 5.0);
        assert_eq!(fuel.consume(-1.0), 0.0);
        assert_eq!(fuel.consume(f64::NAN), 0.0);
        assert_eq!(fuel.fuel_mass(), 1.0);
    }

    #[test]
    fn reset_refills_to_capacity() {
        let mut fuel = FuelState::new(100.0, 1.0, 5.0);
        fuel.consume(1.0);
        fuel.reset();
        assert_eq!(fuel.fuel_mass(), 5.0);
        assert_relative_eq!(fuel.fraction_remaining(), 1.0);
    }
}
