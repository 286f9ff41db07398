use crate::traits::Scalar;

/// Ghost-cell halo width, fixed by the scheme (three-point stencil chained
/// through predictor and corrector).
pub const NGHOST: usize = 3;

/// The eight parallel cell-indexed arrays the scheme operates on, laid out
/// on an `(nx + 2*NGHOST) x (ny + 2*NGHOST)` lattice in row-major order
/// (`iy * nx_all + ix`). Allocated once at construction and never resized.
pub struct Grid<T: Scalar, const W: usize> {
    pub nx: usize,
    pub ny: usize,
    pub nx_all: usize,
    pub ny_all: usize,

    /// Current conserved state.
    pub u: Vec<[T; W]>,
    /// x/y flux evaluations.
    pub f: Vec<[T; W]>,
    pub g: Vec<[T; W]>,
    /// Limited first differences of u in x/y.
    pub ux: Vec<[T; W]>,
    pub uy: Vec<[T; W]>,
    /// Limited first differences of f in x, g in y.
    pub fx: Vec<[T; W]>,
    pub gy: Vec<[T; W]>,
    /// Next-step scratch buffer.
    pub v: Vec<[T; W]>,
}

impl<T: Scalar, const W: usize> Grid<T, W> {
    pub fn new(nx: usize, ny: usize) -> Self {
        let nx_all = nx + 2 * NGHOST;
        let ny_all = ny + 2 * NGHOST;
        let size = nx_all * ny_all;
        let zero = [T::zero(); W];
        Self {
            nx,
            ny,
            nx_all,
            ny_all,
            u: vec![zero; size],
            f: vec![zero; size],
            g: vec![zero; size],
            ux: vec![zero; size],
            uy: vec![zero; size],
            fx: vec![zero; size],
            gy: vec![zero; size],
            v: vec![zero; size],
        }
    }

    /// Flat index of cell `(ix, iy)` on the halo-extended lattice.
    #[inline]
    pub fn idx(&self, ix: usize, iy: usize) -> usize {
        iy * self.nx_all + ix
    }

    /// Non-negative mathematical modulus (`%` may return negative values
    /// for negative dividends in languages this scheme was ported from;
    /// Rust's `%` on `isize` has the same issue, so this is explicit).
    #[inline]
    fn wrap(a: isize, n: usize) -> usize {
        let n = n as isize;
        (((a % n) + n) % n) as usize
    }

    /// Overwrite every halo cell of `u` with the periodic image of the live
    /// interior. Idempotent; after return, invariant I1 holds relative to
    /// `u`.
    pub fn apply_periodic(&mut self) {
        let nx = self.nx;
        let ny = self.ny;
        let nx_all = self.nx_all;
        let ny_all = self.ny_all;
        for iy in 0..ny_all {
            for ix in 0..nx_all {
                let is_halo =
                    ix < NGHOST || ix >= NGHOST + nx || iy < NGHOST || iy >= NGHOST + ny;
                if !is_halo {
                    continue;
                }
                let src_ix = NGHOST + Self::wrap(ix as isize - NGHOST as isize, nx);
                let src_iy = NGHOST + Self::wrap(iy as isize - NGHOST as isize, ny);
                let src = self.idx(src_ix, src_iy);
                let dst = self.idx(ix, iy);
                self.u[dst] = self.u[src];
            }
        }
    }
}
