pub mod algebra;
pub mod cm;
pub mod curve;
pub mod error;
pub mod export;
pub mod isogeny;
pub mod level;
pub mod modular;
pub mod setting;
pub mod structures;
pub mod tower;
pub mod utils;

pub use algebra::field::Field;
pub use algebra::ring::Ring;

pub use structures::fp::{Fp, PrimeModulus};
pub use structures::fp2::{ExtensionMode, Fp2, QuadraticModulus};
pub use structures::poly::Poly;

pub use cm::{build_supersingular_curve, cm_discriminant, SupersingularCurve};
pub use curve::{CurveFactory, EllipticCurve, Point};
pub use error::{Error, Result};
pub use export::{magma_system, MagmaSystem, MultiPoly};
pub use isogeny::{codomain_a2, codomain_a3, codomain_a4, montgomery_j_invariant, push2, push3};
pub use level::{LevelChain, LevelFactory, LevelParameter};
pub use modular::{modular2, modular3, modular4};
pub use setting::{Setting, SettingConfig, SettingConfigBuilder};
pub use tower::{FieldTower, TowerSnapshot};
pub use utils::{gcd, is_prime};
