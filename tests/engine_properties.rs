use diskgas::core::container::Container;
use diskgas::core::{EventKind, Particle, Simulation, Step};
use diskgas::core::vector;
use diskgas::output::MemorySink;
use diskgas::{Result, SimConfig};

fn gas(particle_count: usize, speed: f64, seed: u64, obstacle: bool) -> SimConfig {
    SimConfig {
        particle_count,
        speed,
        radius: 1e-3,
        mass: 1.0,
        max_time: 0.2,
        obstacle,
        seed: Some(seed),
    }
}

/// Total kinetic energy is conserved by elastic and specular collisions.
#[test]
fn energy_conservation_over_run() -> Result<()> {
    let mut sim = Simulation::new(&gas(120, 3.0, 12345, true))?;
    let e0 = sim.kinetic_energy();
    let summary = sim.run(&mut MemorySink::new())?;
    assert!(summary.valid_events > 100, "too few events: {}", summary.valid_events);

    let e1 = sim.kinetic_energy();
    let rel = ((e1 - e0) / e0).abs();
    assert!(
        rel < 1e-9,
        "relative energy drift {} too large (E0={}, E1={})",
        rel,
        e0,
        e1
    );
    Ok(())
}

/// Time never runs backwards and particles stay inside the container.
#[test]
fn time_is_monotone_and_particles_stay_inside() -> Result<()> {
    let mut sim = Simulation::new(&gas(80, 2.0, 7777, true))?;
    let container = *sim.container();
    let mut sink = MemorySink::new();
    sim.run(&mut sink)?;

    let mut last = 0.0;
    for frame in &sink.frames {
        assert!(frame.time >= last, "time went backwards: {} < {}", frame.time, last);
        last = frame.time;
        for p in &frame.particles {
            let dist = vector::norm(&p.r);
            assert!(dist <= container.wall_contact_radius(p.radius) + 1e-9);
            if let Some(contact) = container.obstacle_contact_radius(p.radius) {
                assert!(dist >= contact - 1e-9);
            }
        }
    }
    Ok(())
}

/// Stale pops neither advance time nor produce frames.
#[test]
fn stale_events_never_advance_or_record() -> Result<()> {
    let mut sim = Simulation::new(&gas(150, 4.0, 2024, true))?;
    let mut resolved = 0u64;
    loop {
        let t_before = sim.time();
        let ke_before = sim.kinetic_energy();
        let counts_before: Vec<u64> = sim.particles().iter().map(|p| p.collision_count).collect();
        match sim.step()? {
            Step::Stale => {
                assert_eq!(sim.time(), t_before);
                assert_eq!(sim.kinetic_energy(), ke_before);
                let counts: Vec<u64> = sim.particles().iter().map(|p| p.collision_count).collect();
                assert_eq!(counts, counts_before);
            }
            Step::Resolved(_) => resolved += 1,
            Step::Finished => break,
        }
    }
    let stats = sim.stats();
    assert_eq!(stats.valid_events, resolved);
    assert!(stats.stale_events > 0, "expected some superseded predictions");
    Ok(())
}

/// Every resolved event bumps exactly its participants' counters.
#[test]
fn collision_counters_track_participation() -> Result<()> {
    let mut sim = Simulation::new(&gas(60, 2.0, 99, true))?;
    for _ in 0..500 {
        let before: Vec<u64> = sim.particles().iter().map(|p| p.collision_count).collect();
        match sim.step()? {
            Step::Resolved(kind) => {
                let after: Vec<u64> = sim.particles().iter().map(|p| p.collision_count).collect();
                for (k, (b, a)) in before.iter().zip(&after).enumerate() {
                    let involved = k as u32 == kind.first() || Some(k as u32) == kind.second();
                    assert_eq!(*a, *b + u64::from(involved), "particle {k} after {kind:?}");
                }
            }
            Step::Stale => {}
            Step::Finished => break,
        }
    }
    Ok(())
}

/// Oblique elastic collision: approach becomes separation, energy unchanged.
#[test]
fn pair_resolution_reverses_normal_velocity() -> Result<()> {
    let container = Container::standard(false);
    // Offset of 0.0005 between the lines of motion, less than the radius sum 0.002
    let a = Particle::new(0, [-0.01, 0.00025], [1.0, 0.1], 1e-3, 1.0)?;
    let b = Particle::new(1, [0.01, -0.00025], [-0.5, 0.1], 1e-3, 2.0)?;
    let mut sim = Simulation::from_particles(container, vec![a, b], 1.0)?;

    let mut before: Option<(Particle, Particle)> = None;
    loop {
        let snapshot = (sim.particles()[0].clone(), sim.particles()[1].clone());
        match sim.step()? {
            Step::Resolved(EventKind::Pair { .. }) => {
                before = Some(snapshot);
                break;
            }
            Step::Finished => break,
            _ => {}
        }
    }
    let (a0, b0) = before.expect("pair collision expected");
    assert!(sim.time() > 0.0);

    let (a1, b1) = (&sim.particles()[0], &sim.particles()[1]);
    let dr = vector::sub(&b1.r, &a1.r);
    let dvdr_before = vector::dot(&dr, &vector::sub(&b0.v, &a0.v));
    let dvdr_after = vector::dot(&dr, &vector::sub(&b1.v, &a1.v));
    assert!(dvdr_before < 0.0);
    assert!(dvdr_after >= 0.0);
    assert!((dvdr_after + dvdr_before).abs() < 1e-12);

    let e0 = a0.kinetic_energy() + b0.kinetic_energy();
    let e1 = a1.kinetic_energy() + b1.kinetic_energy();
    assert!(((e1 - e0) / e0).abs() < 1e-12);

    // Momentum is conserved as well
    for k in 0..2 {
        let p0 = a0.mass * a0.v[k] + b0.mass * b0.v[k];
        let p1 = a1.mass * a1.v[k] + b1.mass * b1.v[k];
        assert!((p0 - p1).abs() < 1e-12);
    }
    Ok(())
}

/// Same seed, same trajectory.
#[test]
fn seeded_runs_are_reproducible() -> Result<()> {
    let config = gas(50, 2.0, 31337, true);
    let mut a = Simulation::new(&config)?;
    let mut b = Simulation::new(&config)?;
    let sa = a.run(&mut MemorySink::new())?;
    let sb = b.run(&mut MemorySink::new())?;
    assert_eq!(sa, sb);
    assert_eq!(a.particles(), b.particles());
    Ok(())
}

/// Without an obstacle there is no obstacle pressure and no obstacle hits.
#[test]
fn obstacle_statistics() -> Result<()> {
    let mut bare = Simulation::new(&gas(80, 3.0, 5, false))?;
    let summary = bare.run(&mut MemorySink::new())?;
    assert_eq!(summary.obstacle_pressure, 0.0);
    assert_eq!(summary.obstacle_collisions, 0);
    assert!(summary.wall_pressure > 0.0);

    let mut with = Simulation::new(&gas(80, 3.0, 5, true))?;
    let mut sink = MemorySink::new();
    let summary = with.run(&mut sink)?;
    assert!(summary.obstacle_first_hits <= summary.obstacle_collisions);
    assert!(summary.obstacle_first_hits <= 80);
    let mut last = (0, 0);
    for f in &sink.frames {
        assert!(f.obstacle_first_hits >= last.0 && f.obstacle_collisions >= last.1);
        last = (f.obstacle_first_hits, f.obstacle_collisions);
    }
    if summary.obstacle_collisions > 0 {
        assert!(summary.obstacle_pressure > 0.0);
    }
    Ok(())
}
