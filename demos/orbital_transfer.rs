use std::sync::Arc;

use nalgebra::Vector3;
use orbit_calc::physics::gravity::earth;
use orbit_calc::{HohmannTransfer, Orbit, OrbitError, ParticleBuilder};

fn main() -> Result<(), OrbitError> {
    let body = Arc::new(earth());

    println!("=== Orbital Elements ===\n");

    let satellite = ParticleBuilder::new("Satellite")
        .mass(1000.0)
        .position(Vector3::new(1600.0, 5310.0, 3800.0))
        .velocity(Vector3::new(-7.350, 0.460, 2.470))
        .build()?;
    let orbit = Orbit::new(Arc::clone(&body), Arc::new(satellite))?;

    println!("Eccentricity:      {:.6}", orbit.eccentricity());
    println!("Inclination:       {:.3} deg", orbit.inclination());
    println!("RAAN:              {:.3} deg", orbit.right_ascension()?);
    println!("Arg. of perigee:   {:.3} deg", orbit.perigee_argument()?);
    println!("True anomaly:      {:.3} deg", orbit.true_anomaly()?);
    println!("Semimajor axis:    {:.1} km", orbit.semimajor_axis());
    println!("Period:            {:.1} min", orbit.period()? / 60.0);
    println!();

    println!("=== Universal-Variable Propagation ===\n");

    let period = orbit.period()?;
    for i in 0..=4 {
        let dt = i as f64 * period / 4.0;
        let (pos, vel) = orbit.state_at(dt)?;
        println!(
            "  t={:>7.1}s  r=({:>9.2}, {:>9.2}, {:>9.2}) km  |v|={:.4} km/s",
            dt, pos.x, pos.y, pos.z, vel.norm()
        );
    }
    let sol = orbit.universal_anomaly(3600.0)?;
    println!();
    println!("chi(3600 s) = {:.4} km^0.5 after {} iterations", sol.chi, sol.iterations);
    println!();

    println!("=== Hohmann Transfer: 480x800 km -> 16000x16001 km ===\n");

    let spacecraft = ParticleBuilder::new("Spacecraft").mass(2000.0).validity(1.0e9).build()?;
    let start = Orbit::from_altitudes(Arc::clone(&body), &spacecraft, 480.0, 800.0)?;
    let end = Orbit::from_altitudes(Arc::clone(&body), &spacecraft, 16_000.0, 16_001.0)?;
    let transfer = HohmannTransfer::new(start, end)?;

    for (label, path) in [
        ("perigee-first", transfer.perigee_first()),
        ("apogee-first", transfer.apogee_first()),
    ] {
        println!(
            "  {:<14} dv1={:.4} km/s  dv2={:.4} km/s  total={:.4} km/s  tof={:.2} h",
            label,
            path.first_impulse,
            path.second_impulse,
            path.total,
            path.transfer_time / 3600.0
        );
    }

    Ok(())
}
