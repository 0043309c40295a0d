/// `MSD = 4 D t` for isotropic diffusion in two dimensions.
pub const DIFFUSION_FACTOR_2D: f64 = 4.0;

/// Frames from `floor(EQUILIBRIUM_TAIL_START * nframes)` on are averaged for the equilibrium pressure.
pub const EQUILIBRIUM_TAIL_START: f64 = 0.9;
