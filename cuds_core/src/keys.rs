//! Attribute key registry.
//!
//! The closed set of attribute keys a CUDS row may carry. Every key has a
//! fixed element type and shape; exported attribute arrays are named with the
//! key's upper-case symbolic name.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::{CudsError, Result};
use crate::value::AttributeValue;

/// Element type of an attribute key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 64-bit floating point.
    Float,
    /// 64-bit signed integer.
    Int,
    /// Free text.
    Text,
    /// 128-bit identifier.
    Uid,
}

impl ElementType {
    /// True for the numeric element types.
    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self, ElementType::Float | ElementType::Int)
    }
}

/// Shape of a single attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// One element.
    Scalar,
    /// Three elements.
    Vector3,
    /// Nine elements arranged as 3x3.
    Matrix3,
}

impl Shape {
    /// Number of elements (array components) of one value.
    #[inline]
    pub const fn components(self) -> usize {
        match self {
            Shape::Scalar => 1,
            Shape::Vector3 => 3,
            Shape::Matrix3 => 9,
        }
    }
}

macro_rules! attribute_keys {
    ($( $(#[$doc:meta])* $variant:ident => ($name:literal, $ty:ident, $shape:ident), )*) => {
        /// A registered attribute key.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum AttributeKey {
            $( $(#[$doc])* $variant, )*
        }

        impl AttributeKey {
            /// Every registered key, in declaration order.
            pub const ALL: &'static [AttributeKey] = &[ $( AttributeKey::$variant, )* ];

            /// The canonical upper-case name.
            pub const fn name(self) -> &'static str {
                match self {
                    $( AttributeKey::$variant => $name, )*
                }
            }

            /// Declared element type.
            pub const fn element_type(self) -> ElementType {
                match self {
                    $( AttributeKey::$variant => ElementType::$ty, )*
                }
            }

            /// Declared value shape.
            pub const fn shape(self) -> Shape {
                match self {
                    $( AttributeKey::$variant => Shape::$shape, )*
                }
            }

            /// Look a key up by its canonical name.
            pub fn from_name(name: &str) -> Result<Self> {
                match name {
                    $( $name => Ok(AttributeKey::$variant), )*
                    _ => Err(CudsError::UnknownKey { name: name.to_string() }),
                }
            }
        }
    };
}

attribute_keys! {
    /// Human readable name.
    Name => ("NAME", Text, Scalar),
    /// Unique identifier.
    Uid => ("UID", Uid, Scalar),
    /// Direction vector.
    Direction => ("DIRECTION", Float, Vector3),
    /// Status flag.
    Status => ("STATUS", Int, Scalar),
    /// Integer label.
    Label => ("LABEL", Int, Scalar),
    /// Material identifier.
    MaterialId => ("MATERIAL_ID", Int, Scalar),
    /// Material type.
    MaterialType => ("MATERIAL_TYPE", Int, Scalar),
    /// Chemical species name.
    ChemicalSpecie => ("CHEMICAL_SPECIE", Text, Scalar),
    /// Lattice vectors of a unit cell.
    LatticeVectors => ("LATTICE_VECTORS", Float, Matrix3),
    /// Occupancy of a site.
    Occupancy => ("OCCUPANCY", Float, Scalar),
    /// Bond label.
    BondLabel => ("BOND_LABEL", Int, Scalar),
    /// Bond type.
    BondType => ("BOND_TYPE", Int, Scalar),
    /// Velocity.
    Velocity => ("VELOCITY", Float, Vector3),
    /// Acceleration.
    Acceleration => ("ACCELERATION", Float, Vector3),
    /// Number of points.
    NumberOfPoints => ("NUMBER_OF_POINTS", Int, Scalar),
    /// Radius.
    Radius => ("RADIUS", Float, Scalar),
    /// Size.
    Size => ("SIZE", Float, Scalar),
    /// Mass.
    Mass => ("MASS", Float, Scalar),
    /// Volume.
    Volume => ("VOLUME", Float, Scalar),
    /// Angular velocity.
    AngularVelocity => ("ANGULAR_VELOCITY", Float, Vector3),
    /// Angular acceleration.
    AngularAcceleration => ("ANGULAR_ACCELERATION", Float, Vector3),
    /// Simulation domain dimensions.
    SimulationDomainDimensions => ("SIMULATION_DOMAIN_DIMENSIONS", Int, Vector3),
    /// Simulation domain origin.
    SimulationDomainOrigin => ("SIMULATION_DOMAIN_ORIGIN", Float, Vector3),
    /// Dynamic viscosity.
    DynamicViscosity => ("DYNAMIC_VISCOSITY", Float, Scalar),
    /// Kinematic viscosity.
    KinematicViscosity => ("KINEMATIC_VISCOSITY", Float, Scalar),
    /// Diffusion coefficient.
    DiffusionCoefficient => ("DIFFUSION_COEFFICIENT", Float, Scalar),
    /// Probability coefficient.
    ProbabilityCoefficient => ("PROBABILITY_COEFFICIENT", Float, Scalar),
    /// Friction coefficient.
    FrictionCoefficient => ("FRICTION_COEFFICIENT", Float, Scalar),
    /// Scaling coefficient.
    ScalingCoefficient => ("SCALING_COEFFICIENT", Float, Scalar),
    /// Equation of state coefficient.
    EquationOfStateCoefficient => ("EQUATION_OF_STATE_COEFFICIENT", Float, Scalar),
    /// Contact angle.
    ContactAngle => ("CONTACT_ANGLE", Float, Scalar),
    /// Amphiphilicity.
    Amphiphilicity => ("AMPHIPHILICITY", Float, Scalar),
    /// Phase interaction strength.
    PhaseInteractionStrength => ("PHASE_INTERACTION_STRENGTH", Float, Scalar),
    /// Hamaker constant.
    HamakerConstant => ("HAMAKER_CONSTANT", Float, Scalar),
    /// Zeta potential.
    ZetaPotential => ("ZETA_POTENTIAL", Float, Scalar),
    /// Ion valence effect.
    IonValenceEffect => ("ION_VALENCE_EFFECT", Float, Scalar),
    /// Debye length.
    DebyeLength => ("DEBYE_LENGTH", Float, Scalar),
    /// Smoothing length.
    SmoothingLength => ("SMOOTHING_LENGTH", Float, Scalar),
    /// Lattice spacing.
    LatticeSpacing => ("LATTICE_SPACING", Float, Scalar),
    /// Time step.
    TimeStep => ("TIME_STEP", Float, Scalar),
    /// Number of time steps.
    NumberOfTimeSteps => ("NUMBER_OF_TIME_STEPS", Int, Scalar),
    /// Force.
    Force => ("FORCE", Float, Vector3),
    /// Torque.
    Torque => ("TORQUE", Float, Vector3),
    /// Density.
    Density => ("DENSITY", Float, Scalar),
    /// Concentration.
    Concentration => ("CONCENTRATION", Float, Scalar),
    /// Pressure.
    Pressure => ("PRESSURE", Float, Scalar),
    /// Temperature.
    Temperature => ("TEMPERATURE", Float, Scalar),
    /// Distribution.
    Distribution => ("DISTRIBUTION", Float, Vector3),
    /// Order parameter.
    OrderParameter => ("ORDER_PARAMETER", Float, Scalar),
    /// Original position.
    OriginalPosition => ("ORIGINAL_POSITION", Float, Vector3),
    /// Delta displacement.
    DeltaDisplacement => ("DELTA_DISPLACEMENT", Float, Vector3),
    /// External applied force.
    ExternalAppliedForce => ("EXTERNAL_APPLIED_FORCE", Float, Vector3),
    /// Euler angles.
    EulerAngles => ("EULER_ANGLES", Float, Vector3),
    /// Sphericity.
    Sphericity => ("SPHERICITY", Float, Scalar),
    /// Young modulus.
    YoungModulus => ("YOUNG_MODULUS", Float, Scalar),
    /// Poisson ratio.
    PoissonRatio => ("POISSON_RATIO", Float, Scalar),
    /// Natural log of the restitution coefficient.
    LnOfRestitutionCoefficient => ("LN_OF_RESTITUTION_COEFFICIENT", Float, Scalar),
    /// Rolling friction.
    RollingFriction => ("ROLLING_FRICTION", Float, Scalar),
    /// Volume fraction.
    VolumeFraction => ("VOLUME_FRACTION", Float, Scalar),
    /// Charge.
    Charge => ("CHARGE", Float, Scalar),
    /// Magnetic field.
    MagneticField => ("MAGNETIC_FIELD", Float, Vector3),
    /// Electric field.
    ElectricField => ("ELECTRIC_FIELD", Float, Vector3),
    /// Energy.
    Energy => ("ENERGY", Float, Scalar),
    /// Number of atoms.
    NumberOfAtoms => ("NUMBER_OF_ATOMS", Int, Scalar),
    /// Periodic lattice shift.
    LatticeShift => ("LATTICE_SHIFT", Int, Vector3),
}

impl AttributeKey {
    /// Default value for rows that have no value for this key.
    ///
    /// NaN (or a NaN 3-vector) for floating keys and −1 (or a −1 3-vector)
    /// for integer keys. Non-numeric keys default to [`AttributeValue::Null`].
    pub fn default_value(self) -> AttributeValue {
        match (self.element_type(), self.shape()) {
            (ElementType::Float, Shape::Scalar) => AttributeValue::Float(f64::NAN),
            (ElementType::Float, Shape::Vector3) => AttributeValue::Float3([f64::NAN; 3]),
            (ElementType::Int, Shape::Scalar) => AttributeValue::Int(-1),
            (ElementType::Int, Shape::Vector3) => AttributeValue::Int3([-1; 3]),
            _ => AttributeValue::Null,
        }
    }

    /// True when values of this key can be stored as a numeric scalar or
    /// 3-vector column.
    pub const fn is_representable(self) -> bool {
        self.element_type().is_numeric()
            && matches!(self.shape(), Shape::Scalar | Shape::Vector3)
    }

    /// Check that `value` has the element type and shape of this key.
    ///
    /// Explicit nulls are accepted for every key.
    pub fn check_value(self, value: &AttributeValue) -> Result<()> {
        let ok = match (self.element_type(), self.shape(), value) {
            (_, _, AttributeValue::Null) => true,
            (ElementType::Float, Shape::Scalar, AttributeValue::Float(_)) => true,
            (ElementType::Float, Shape::Vector3, AttributeValue::Float3(_)) => true,
            (ElementType::Int, Shape::Scalar, AttributeValue::Int(_)) => true,
            (ElementType::Int, Shape::Vector3, AttributeValue::Int3(_)) => true,
            (ElementType::Float, Shape::Matrix3, AttributeValue::Float9(_)) => true,
            (ElementType::Text, _, AttributeValue::Text(_)) => true,
            (ElementType::Uid, _, AttributeValue::Uid(_)) => true,
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(CudsError::type_error(format!(
                "value {:?} does not match {} ({:?}, {:?})",
                value,
                self.name(),
                self.element_type(),
                self.shape()
            )))
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AttributeKey {
    type Err = CudsError;

    fn from_str(s: &str) -> Result<Self> {
        AttributeKey::from_name(s)
    }
}

/// Keys whose values can be stored as numeric scalar or 3-vector columns.
///
/// Keys with any other type or shape are excluded; each exclusion is reported
/// once through `tracing`.
pub fn supported_keys() -> &'static [AttributeKey] {
    static SUPPORTED: OnceLock<Vec<AttributeKey>> = OnceLock::new();
    SUPPORTED.get_or_init(|| {
        AttributeKey::ALL
            .iter()
            .copied()
            .filter(|key| {
                let ok = key.is_representable();
                if !ok {
                    tracing::warn!(
                        key = key.name(),
                        element_type = ?key.element_type(),
                        shape = ?key.shape(),
                        "attribute key is not representable as a scalar or 3-vector column; skipped"
                    );
                }
                ok
            })
            .collect()
    })
}
