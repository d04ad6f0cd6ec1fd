// mf-core/src/units.rs

use uom::si::f64::{
    ElectricPotential as UomElectricPotential,
    ThermodynamicTemperature as UomThermodynamicTemperature, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type ElectricPotential = UomElectricPotential;
pub type FlowRate = UomVolumeRate;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn degc(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn lpm(v: f64) -> FlowRate {
    use uom::si::volume_rate::liter_per_minute;
    FlowRate::new::<liter_per_minute>(v)
}

// uom has no milliliter_per_minute unit; go through liter_per_minute.
#[inline]
pub fn mlpm(v: f64) -> FlowRate {
    use uom::si::volume_rate::liter_per_minute;
    FlowRate::new::<liter_per_minute>(v * 1e-3)
}

#[inline]
pub fn volts(v: f64) -> ElectricPotential {
    use uom::si::electric_potential::volt;
    ElectricPotential::new::<volt>(v)
}

/// Temperature magnitude on the absolute scale.
///
/// Gas-law style corrections only make sense as ratios of absolute temperatures,
/// so every correction site converts through here.
#[inline]
pub fn in_kelvin(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

/// Flow magnitude in ml/min, the conventional MFC reporting unit.
#[inline]
pub fn in_mlpm(f: FlowRate) -> f64 {
    use uom::si::volume_rate::liter_per_minute;
    f.get::<liter_per_minute>() * 1e3
}
