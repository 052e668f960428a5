//! The shipped detector battery.
//!
//! Each detector is a plug-in obeying the [`crate::smell::SmellDetector`]
//! contract; the set is open and callers may register their own.

pub mod complexity;
pub mod control_couple;
pub mod design;
pub mod low_cohesion;
pub mod naming;
pub mod unused;

pub use complexity::{LongParameterListDetector, NestedIteratorsDetector, TooManyMethodsDetector};
pub use control_couple::BooleanParameterDetector;
pub use design::{ClassVariableDetector, ModuleInitializeDetector};
pub use low_cohesion::UtilityFunctionDetector;
pub use naming::{UncommunicativeMethodNameDetector, UncommunicativeParameterNameDetector};
pub use unused::UnusedParametersDetector;

use crate::smell::DetectorRegistry;

/// Registry holding every shipped detector, in stable registration order.
pub fn default_detectors() -> DetectorRegistry {
    DetectorRegistry::new()
        .with_detector(LongParameterListDetector)
        .with_detector(TooManyMethodsDetector)
        .with_detector(NestedIteratorsDetector)
        .with_detector(BooleanParameterDetector)
        .with_detector(UtilityFunctionDetector)
        .with_detector(ClassVariableDetector)
        .with_detector(ModuleInitializeDetector)
        .with_detector(UncommunicativeMethodNameDetector)
        .with_detector(UncommunicativeParameterNameDetector)
        .with_detector(UnusedParametersDetector)
}
