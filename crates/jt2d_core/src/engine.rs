use anyhow::{bail, ensure, Result as AnyResult};
use serde::Serialize;

use crate::error::SolverError;
use crate::grid::{Grid, NGHOST};
use crate::physics::Physics;
use crate::stencil::{compute_fg_speeds, limited_derivs};
use crate::step::compute_step;
use crate::traits::Scalar;

/// One diagnostic record emitted per sub-step: integrated mass, integrated
/// x/y momentum, and the min/max of the first ("depth") component over the
/// live interior.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Diagnostics {
    pub integrated_mass: f64,
    pub integrated_momentum_x: f64,
    pub integrated_momentum_y: f64,
    pub h_min: f64,
    pub h_max: f64,
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.integrated_mass,
            self.integrated_momentum_x,
            self.integrated_momentum_y,
            self.h_min,
            self.h_max
        )
    }
}

/// Drives the staggered Jiang-Tadmor super-step loop over a grid owned
/// exclusively by the engine for its lifetime.
pub struct Engine<T: Scalar, const W: usize, P: Physics<T, W>> {
    pub grid: Grid<T, W>,
    pub physics: P,
    pub w: T,
    pub h: T,
    pub dx: T,
    pub dy: T,
    pub cfl: T,
    pub theta: T,
    pub t: T,
}

impl<T: Scalar, const W: usize, P: Physics<T, W>> Engine<T, W, P> {
    /// Construct a new engine. Rejects invalid configuration before
    /// allocating the grid.
    pub fn new(w: T, h: T, nx: usize, ny: usize, cfl: T, theta: T, physics: P) -> AnyResult<Self> {
        let zero = T::zero();
        ensure!(w > zero, "domain width must be positive, got {:?}", w);
        ensure!(h > zero, "domain height must be positive, got {:?}", h);
        ensure!(nx >= 1, "nx must be at least 1, got {}", nx);
        ensure!(ny >= 1, "ny must be at least 1, got {}", ny);
        let half = T::from_f64(0.5).unwrap();
        if !(cfl > zero && cfl <= half) {
            bail!("cfl must lie in (0, 0.5], got {:?}", cfl);
        }
        let one = T::one();
        let two = T::from_f64(2.0).unwrap();
        if !(theta >= one && theta <= two) {
            bail!("theta must lie in [1, 2], got {:?}", theta);
        }

        let nx_f = T::from_usize(nx).unwrap();
        let ny_f = T::from_usize(ny).unwrap();
        Ok(Self {
            grid: Grid::new(nx, ny),
            physics,
            w,
            h,
            dx: w / nx_f,
            dy: h / ny_f,
            cfl,
            theta,
            t: zero,
        })
    }

    /// Invoke `f(out_state, x, y)` exactly once per live cell at the cell
    /// center, for `(ix, iy)` in `[0, nx) x [0, ny)`.
    pub fn init(&mut self, mut f: impl FnMut(&mut [T; W], T, T)) {
        let half = T::from_f64(0.5).unwrap();
        for iy in 0..self.grid.ny {
            for ix in 0..self.grid.nx {
                let x = (T::from_usize(ix).unwrap() + half) * self.dx;
                let y = (T::from_usize(iy).unwrap() + half) * self.dy;
                let i = self.grid.idx(ix + NGHOST, iy + NGHOST);
                f(&mut self.grid.u[i], x, y);
            }
        }
    }

    /// Traverses the live interior, computes integrated mass/momentum and
    /// depth extrema, emits one diagnostic line, and asserts positivity.
    /// Fatal: returns `SolverError::Diverged` on the first non-positive
    /// depth found.
    pub fn solution_check(&self) -> Result<Diagnostics, SolverError> {
        let cell_area = (self.dx * self.dy).to_f64().unwrap();
        let mut mass = 0.0;
        let mut mom_x = 0.0;
        let mut mom_y = 0.0;
        let mut h_min = f64::INFINITY;
        let mut h_max = f64::NEG_INFINITY;

        for iy in 0..self.grid.ny {
            for ix in 0..self.grid.nx {
                let i = self.grid.idx(ix + NGHOST, iy + NGHOST);
                let u = self.grid.u[i];
                let depth = u[0].to_f64().unwrap();
                if depth <= 0.0 {
                    return Err(SolverError::Diverged {
                        ix,
                        iy,
                        value: depth,
                    });
                }
                mass += depth * cell_area;
                if W > 1 {
                    mom_x += u[1].to_f64().unwrap() * cell_area;
                }
                if W > 2 {
                    mom_y += u[2].to_f64().unwrap() * cell_area;
                }
                h_min = h_min.min(depth);
                h_max = h_max.max(depth);
            }
        }

        let diag = Diagnostics {
            integrated_mass: mass,
            integrated_momentum_x: mom_x,
            integrated_momentum_y: mom_y,
            h_min,
            h_max,
        };
        println!("{diag}");
        Ok(diag)
    }

    /// Runs the super-step loop until `t >= tfinal`, always in pairs of
    /// sub-steps (io = 0 then io = 1). Aborts on divergence.
    pub fn run(&mut self, tfinal: T) -> Result<(), SolverError> {
        let mut done = false;
        while !done {
            let mut dt = T::zero();
            for io in 0..2 {
                self.grid.apply_periodic();
                self.solution_check()?;
                let (cx, cy) = compute_fg_speeds(&mut self.grid, &self.physics);
                limited_derivs(&mut self.grid, self.theta);

                if io == 0 {
                    let speed = (cx / self.dx).max(cy / self.dy);
                    dt = self.cfl / speed;
                    let two = T::from_f64(2.0).unwrap();
                    if self.t + two * dt >= tfinal {
                        dt = (tfinal - self.t) / two;
                        done = true;
                    }
                }
                compute_step(&mut self.grid, &self.physics, io, dt, self.dx, self.dy);
                self.t = self.t + dt;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shallow_water::ShallowWater;

    #[test]
    fn new_rejects_invalid_configuration() {
        let physics = ShallowWater::<f64>::default();
        assert!(Engine::new(0.0, 1.0, 4, 4, 0.2, 1.0, physics).is_err());
        let physics = ShallowWater::<f64>::default();
        assert!(Engine::new(1.0, 1.0, 4, 4, 0.6, 1.0, physics).is_err());
        let physics = ShallowWater::<f64>::default();
        assert!(Engine::new(1.0, 1.0, 4, 4, 0.2, 0.5, physics).is_err());
        let physics = ShallowWater::<f64>::default();
        assert!(Engine::new(1.0, 1.0, 4, 4, 0.2, 1.0, physics).is_ok());
    }

    #[test]
    fn cfl_is_respected_at_io_zero() {
        // Directly check property P7: for any dt the run loop picks at
        // io = 0, dt * max(cx/dx, cy/dy) <= cfl.
        let physics = ShallowWater::<f64>::default();
        let mut engine = Engine::new(2.0, 2.0, 20, 20, 0.2, 2.0, physics).unwrap();
        engine.init(|u, _x, _y| *u = [1.5, 0.3, -0.2]);
        engine.grid.apply_periodic();
        engine.solution_check().unwrap();
        let (cx, cy) = compute_fg_speeds(&mut engine.grid, &engine.physics);
        let speed = (cx / engine.dx).max(cy / engine.dy);
        let dt = engine.cfl / speed;
        assert!(dt * speed <= engine.cfl + 1e-12);
    }

    /// Scenario 1 / property P5: still pond is a steady state.
    #[test]
    fn still_pond_is_a_steady_state() {
        let physics = ShallowWater::<f64>::default();
        let mut engine = Engine::new(2.0, 2.0, 60, 60, 0.2, 2.0, physics).unwrap();
        engine.init(|u, _x, _y| *u = [1.0, 0.0, 0.0]);

        engine.run(0.5).unwrap();

        let mut mass = 0.0;
        for iy in 0..engine.grid.ny {
            for ix in 0..engine.grid.nx {
                let i = engine.grid.idx(ix + NGHOST, iy + NGHOST);
                let u = engine.grid.u[i];
                assert!((u[0] - 1.0).abs() < 1e-5, "h = {}", u[0]);
                assert!(u[1].abs() < 1e-5, "hu = {}", u[1]);
                assert!(u[2].abs() < 1e-5, "hv = {}", u[2]);
                mass += u[0] * engine.dx * engine.dy;
            }
        }
        assert!((mass - 4.0).abs() < 1e-4);
    }

    /// Scenario 2 / properties P1-P3: circular dam break conserves mass
    /// and zero net momentum, and never goes non-positive.
    #[test]
    fn circular_dam_break_conserves_mass_and_momentum() {
        use crate::scenarios::circular_dam_break;

        let physics = ShallowWater::<f64>::default();
        let mut engine = Engine::new(2.0, 2.0, 60, 60, 0.2, 2.0, physics).unwrap();
        let init = circular_dam_break(1.0, 1.0, 0.5);
        engine.init(init);

        let mut initial_mass = 0.0;
        for iy in 0..engine.grid.ny {
            for ix in 0..engine.grid.nx {
                let i = engine.grid.idx(ix + NGHOST, iy + NGHOST);
                initial_mass += engine.grid.u[i][0] * engine.dx * engine.dy;
            }
        }

        engine.run(0.5).unwrap();

        let mut mass = 0.0;
        let mut mom_x = 0.0;
        let mut mom_y = 0.0;
        for iy in 0..engine.grid.ny {
            for ix in 0..engine.grid.nx {
                let i = engine.grid.idx(ix + NGHOST, iy + NGHOST);
                let u = engine.grid.u[i];
                assert!(u[0] > 0.0, "depth went non-positive: {}", u[0]);
                mass += u[0] * engine.dx * engine.dy;
                mom_x += u[1] * engine.dx * engine.dy;
                mom_y += u[2] * engine.dx * engine.dy;
            }
        }
        assert!((mass - initial_mass).abs() < 1e-3 * initial_mass.max(1.0));
        assert!(mom_x.abs() < 5e-2);
        assert!(mom_y.abs() < 5e-2);
    }

    /// Scenario 5 / property P8: when the next super-step would cross
    /// tfinal, dt shrinks so the run lands exactly on it after an even
    /// number of sub-steps.
    #[test]
    fn cfl_shrinkage_lands_exactly_on_tfinal() {
        let physics = ShallowWater::<f64>::default();
        let mut engine = Engine::new(2.0, 2.0, 30, 30, 0.2, 2.0, physics).unwrap();
        engine.init(|u, _x, _y| *u = [1.0 + 0.2, 0.5, -0.3]);

        let tfinal = 0.05;
        engine.run(tfinal).unwrap();
        assert!((engine.t - tfinal).abs() < 1e-9);
    }
}
