use crate::grid::Grid;
use crate::limiter::limdiff;
use crate::physics::Physics;
use crate::traits::Scalar;

/// Evaluates `F`/`G` at every cell (including halo) and reduces the
/// per-cell wave-speed bound to a global `(cx_max, cy_max)`. Requires the
/// halo to have been refreshed; the reduction deliberately includes halo
/// cells (after refresh they are periodic images, so the loop can stay
/// rectangular).
pub fn compute_fg_speeds<T: Scalar, const W: usize, P: Physics<T, W>>(
    grid: &mut Grid<T, W>,
    physics: &P,
) -> (T, T) {
    let sentinel = T::from_f64(1e-15).unwrap();
    let mut cx_max = sentinel;
    let mut cy_max = sentinel;
    for iy in 0..grid.ny_all {
        for ix in 0..grid.nx_all {
            let i = grid.idx(ix, iy);
            let u = grid.u[i];
            grid.f[i] = physics.flux_x(&u);
            grid.g[i] = physics.flux_y(&u);
            let (cx, cy) = physics.wave_speed(&u);
            if cx > cx_max {
                cx_max = cx;
            }
            if cy > cy_max {
                cy_max = cy;
            }
        }
    }
    (cx_max, cy_max)
}

/// Limited central differences of `u` and of the fluxes `f`, `g`, written
/// into `ux`, `uy`, `fx`, `gy` for every interior-plus-one cell
/// `[1, nx_all - 1) x [1, ny_all - 1)`. Requires `f`/`g` to already hold
/// this sub-step's flux evaluation.
pub fn limited_derivs<T: Scalar, const W: usize>(grid: &mut Grid<T, W>, theta: T) {
    for iy in 1..grid.ny_all - 1 {
        for ix in 1..grid.nx_all - 1 {
            let i = grid.idx(ix, iy);
            let im = grid.idx(ix - 1, iy);
            let ip = grid.idx(ix + 1, iy);
            let jm = grid.idx(ix, iy - 1);
            let jp = grid.idx(ix, iy + 1);
            for k in 0..W {
                grid.ux[i][k] = limdiff(grid.u[im][k], grid.u[i][k], grid.u[ip][k], theta);
                grid.fx[i][k] = limdiff(grid.f[im][k], grid.f[i][k], grid.f[ip][k], theta);
                grid.uy[i][k] = limdiff(grid.u[jm][k], grid.u[i][k], grid.u[jp][k], theta);
                grid.gy[i][k] = limdiff(grid.g[jm][k], grid.g[i][k], grid.g[jp][k], theta);
            }
        }
    }
}
