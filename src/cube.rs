use std::fmt::Display;

use strum::{EnumCount, EnumIter, IntoEnumIterator};

/*
 * The six faces of the cube, as the canonical unfolding draws them:
 *
 *        [C]
 *     [D][A][B]     A faces the viewer, B is to its right, C above,
 *        [E]        D to the left, E below and F behind.
 *        [F]
 *
 * Coordinates are screen-like: x grows rightwards, y downwards, z towards
 * the viewer.
 */

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Vector3(i16, i16, i16);

impl Vector3 {
    pub const X: Self = Self(1, 0, 0);
    pub const Y: Self = Self(0, 1, 0);
    pub const Z: Self = Self(0, 0, 1);

    pub const fn dot(self, rhs: Self) -> i16 {
        self.0 * rhs.0 + self.1 * rhs.1 + self.2 * rhs.2
    }

    pub const fn cross(self, rhs: Self) -> Self {
        Self(
            self.1 * rhs.2 - self.2 * rhs.1,
            self.2 * rhs.0 - self.0 * rhs.2,
            self.0 * rhs.1 - self.1 * rhs.0,
        )
    }

    // quarter turns about an absolute axis; negative counts wrap into [0, 4)
    fn rotated(self, about: Axis, turns: i16) -> Self {
        let Self(x, y, z) = self;

        use Axis::*;

        match (about, turns.rem_euclid(4)) {
            (_, 0) => self,
            (X, 1) => Self(x, -z, y),
            (X, 2) => Self(x, -y, -z),
            (X, 3) => Self(x, z, -y),
            (Y, 1) => Self(z, y, -x),
            (Y, 2) => Self(-x, y, -z),
            (Y, 3) => Self(-z, y, x),
            (Z, 1) => Self(y, -x, z),
            (Z, 2) => Self(-x, -y, z),
            (Z, 3) => Self(-y, x, z),
            (_, n) => unreachable!("quarter turn count {n} out of range"),
        }
    }
}

impl Display for Vector3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self(x, y, z) = self;

        write!(f, "({x}, {y}, {z})")
    }
}

impl From<[i16; 3]> for Vector3 {
    fn from([x, y, z]: [i16; 3]) -> Self {
        Self(x, y, z)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, EnumCount, EnumIter, Eq, Hash, PartialEq)]
pub enum CubeFace {
    A,
    B,
    C,
    D,
    E,
    F,
}

// rightward direction of every face after 0..4 quarter turns about its
// outward normal, with the cube sitting in the identity orientation
static RIGHTWARD: [[[i16; 3]; 4]; 6] = [
    [[1, 0, 0], [0, 1, 0], [-1, 0, 0], [0, -1, 0]], // A
    [[0, 0, -1], [0, 1, 0], [0, 0, 1], [0, -1, 0]], // B
    [[1, 0, 0], [0, 0, 1], [-1, 0, 0], [0, 0, -1]], // C
    [[0, 0, 1], [0, 1, 0], [0, 0, -1], [0, -1, 0]], // D
    [[1, 0, 0], [0, 0, -1], [-1, 0, 0], [0, 0, 1]], // E
    [[1, 0, 0], [0, -1, 0], [-1, 0, 0], [0, 1, 0]], // F
];

impl CubeFace {
    /// Outward normal of the face in the identity orientation.
    pub const fn normal(self) -> Vector3 {
        use CubeFace::*;

        match self {
            A => Vector3(0, 0, 1),
            B => Vector3(1, 0, 0),
            C => Vector3(0, -1, 0),
            D => Vector3(-1, 0, 0),
            E => Vector3(0, 1, 0),
            F => Vector3(0, 0, -1),
        }
    }

    pub fn rightward(self, angle: u8) -> Vector3 {
        RIGHTWARD[self as usize][usize::from(angle)].into()
    }
}

impl Display for CubeFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CubeFace::*;

        match self {
            A => 'A',
            B => 'B',
            C => 'C',
            D => 'D',
            E => 'E',
            F => 'F',
        }
        .fmt(f)
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, EnumCount, EnumIter, Eq, PartialEq)]
pub enum CubeRotation {
    XCw,
    XCcw,
    YCw,
    YCcw,
    ZCw,
    ZCcw,
}

impl CubeRotation {
    pub const fn axis(self) -> Axis {
        use CubeRotation::*;

        match self {
            XCw | XCcw => Axis::X,
            YCw | YCcw => Axis::Y,
            ZCw | ZCcw => Axis::Z,
        }
    }

    // clockwise is a negative quarter turn: the net lives in screen
    // coordinates, with y growing downwards
    pub const fn turns(self) -> i16 {
        use CubeRotation::*;

        match self {
            XCw | YCw | ZCw => -1,
            XCcw | YCcw | ZCcw => 1,
        }
    }

    pub const fn inverse(self) -> Self {
        use CubeRotation::*;

        match self {
            XCw => XCcw,
            XCcw => XCw,
            YCw => YCcw,
            YCcw => YCw,
            ZCw => ZCcw,
            ZCcw => ZCw,
        }
    }
}

impl Display for CubeRotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CubeRotation::*;

        match self {
            XCw => "x-",
            XCcw => "x+",
            YCw => "y-",
            YCcw => "y+",
            ZCw => "z-",
            ZCcw => "z+",
        }
        .fmt(f)
    }
}

/// Attitude of the cube, as the absolute directions its local axes point
/// towards. Rotating never mutates: it hands back a fresh value, so a search
/// can keep as many branches alive as it likes.
#[derive(Clone, Debug)]
pub struct CubeOrientation {
    rotations: Vec<CubeRotation>,
    axis_x: Vector3,
    axis_y: Vector3,
    axis_z: Vector3,
}

impl Default for CubeOrientation {
    fn default() -> Self {
        Self {
            rotations: Vec::new(),
            axis_x: Vector3::X,
            axis_y: Vector3::Y,
            axis_z: Vector3::Z,
        }
    }
}

impl CubeOrientation {
    pub fn axes(&self) -> [Vector3; 3] {
        [self.axis_x, self.axis_y, self.axis_z]
    }

    /// Every rotation applied since the identity, oldest first.
    pub fn history(&self) -> &[CubeRotation] {
        &self.rotations
    }

    const fn axis(&self, about: Axis) -> Vector3 {
        use Axis::*;

        match about {
            X => self.axis_x,
            Y => self.axis_y,
            Z => self.axis_z,
        }
    }

    // v decomposed along the local axes
    fn component(&self, v: Vector3) -> Vector3 {
        Vector3(self.axis_x.dot(v), self.axis_y.dot(v), self.axis_z.dot(v))
    }

    pub fn rotate_vector(&self, rotation: CubeRotation, v: Vector3) -> Vector3 {
        let axis = self.axis(rotation.axis());

        match axis {
            Vector3(s, 0, 0) if s != 0 => v.rotated(Axis::X, rotation.turns() * s),
            Vector3(0, s, 0) if s != 0 => v.rotated(Axis::Y, rotation.turns() * s),
            Vector3(0, 0, s) if s != 0 => v.rotated(Axis::Z, rotation.turns() * s),
            _ => panic!("{axis} is not axis-aligned: orientation axes are skewed"),
        }
    }

    pub fn rotate(&self, rotation: CubeRotation) -> Self {
        let mut rotations = self.rotations.clone();
        rotations.push(rotation);

        let next = Self {
            rotations,
            axis_x: self.rotate_vector(rotation, self.axis_x),
            axis_y: self.rotate_vector(rotation, self.axis_y),
            axis_z: self.rotate_vector(rotation, self.axis_z),
        };

        // a proper rotation keeps the basis right-handed
        debug_assert_eq!(next.axis_x.cross(next.axis_y), next.axis_z);

        next
    }

    /// The face whose outward normal currently points towards the viewer,
    /// and how many quarter turns its layout is from canonical.
    pub fn front_face(&self) -> (CubeFace, u8) {
        let towards_z = self.component(Vector3::Z);

        let face = CubeFace::iter()
            .find(|face| face.normal().dot(towards_z) == 1)
            .unwrap_or_else(|| {
                panic!("no face points towards {towards_z}: orientation axes are skewed")
            });

        let towards_x = self.component(Vector3::X);

        let angle = (0u8..4)
            .find(|&angle| face.rightward(angle).dot(towards_x) == 1)
            .unwrap_or_else(|| {
                panic!("no angle of {face} points towards {towards_x}: orientation axes are skewed")
            });

        (face, angle)
    }

    pub fn top_rotation(&self) -> CubeRotation {
        self.edge_rotation(Vector3::X)
    }

    pub fn bottom_rotation(&self) -> CubeRotation {
        self.edge_rotation(Vector3::X).inverse()
    }

    pub fn right_rotation(&self) -> CubeRotation {
        self.edge_rotation(Vector3::Y)
    }

    pub fn left_rotation(&self) -> CubeRotation {
        self.edge_rotation(Vector3::Y).inverse()
    }

    // exactly one local axis lines up with the reference axis; that axis and
    // the sign of the alignment name the rotation
    fn edge_rotation(&self, reference: Vector3) -> CubeRotation {
        use CubeRotation::*;

        let component = self.component(reference);

        match component {
            Vector3(1, 0, 0) => XCw,
            Vector3(-1, 0, 0) => XCcw,
            Vector3(0, 1, 0) => YCw,
            Vector3(0, -1, 0) => YCcw,
            Vector3(0, 0, 1) => ZCw,
            Vector3(0, 0, -1) => ZCcw,
            _ => panic!("no axis aligns with {reference}: orientation axes are skewed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    // every orientation reachable from the identity
    fn group() -> Vec<CubeOrientation> {
        let mut seen = HashSet::new();
        let mut queue = vec![CubeOrientation::default()];
        let mut out = Vec::new();

        while let Some(o) = queue.pop() {
            if !seen.insert(o.axes()) {
                continue;
            }

            for r in CubeRotation::iter() {
                queue.push(o.rotate(r));
            }

            out.push(o);
        }

        out
    }

    #[test]
    fn test_rotation_primitives() {
        let v = Vector3(1, 2, 3);

        assert_eq!(v.rotated(Axis::X, 0), v);
        assert_eq!(v.rotated(Axis::X, 1), Vector3(1, -3, 2));
        assert_eq!(v.rotated(Axis::X, 2), Vector3(1, -2, -3));
        assert_eq!(v.rotated(Axis::X, 3), Vector3(1, 3, -2));
        assert_eq!(v.rotated(Axis::Y, 1), Vector3(3, 2, -1));
        assert_eq!(v.rotated(Axis::Y, 2), Vector3(-1, 2, -3));
        assert_eq!(v.rotated(Axis::Y, 3), Vector3(-3, 2, 1));
        assert_eq!(v.rotated(Axis::Z, 1), Vector3(2, -1, 3));
        assert_eq!(v.rotated(Axis::Z, 2), Vector3(-1, -2, 3));
        assert_eq!(v.rotated(Axis::Z, 3), Vector3(-2, 1, 3));

        // negative counts wrap into [0, 4)
        assert_eq!(v.rotated(Axis::Z, -1), v.rotated(Axis::Z, 3));
        assert_eq!(v.rotated(Axis::Y, -6), v.rotated(Axis::Y, 2));
    }

    #[test]
    fn test_dot_cross() {
        assert_eq!(Vector3::X.dot(Vector3::Y), 0);
        assert_eq!(Vector3(1, 2, 3).dot(Vector3(4, -5, 6)), 12);

        assert_eq!(Vector3::X.cross(Vector3::Y), Vector3::Z);
        assert_eq!(Vector3::Y.cross(Vector3::Z), Vector3::X);
        assert_eq!(Vector3::Z.cross(Vector3::X), Vector3::Y);
        assert_eq!(Vector3(1, 2, 3).cross(Vector3(4, 5, 6)), Vector3(-3, 6, -3));
    }

    #[test]
    fn test_turn_signs() {
        use CubeRotation::*;

        // fixed by the rest of the coordinate system, so pin all six
        assert_eq!(XCw.turns(), -1);
        assert_eq!(XCcw.turns(), 1);
        assert_eq!(YCw.turns(), -1);
        assert_eq!(YCcw.turns(), 1);
        assert_eq!(ZCw.turns(), -1);
        assert_eq!(ZCcw.turns(), 1);
    }

    #[test]
    fn test_orthonormal_through_rotations() {
        for o in group() {
            for r in CubeRotation::iter() {
                let [x, y, z] = o.rotate(r).axes();

                assert_eq!(x.dot(x), 1);
                assert_eq!(y.dot(y), 1);
                assert_eq!(z.dot(z), 1);
                assert_eq!(x.dot(y), 0);
                assert_eq!(y.dot(z), 0);
                assert_eq!(z.dot(x), 0);
                assert_eq!(x.cross(y), z);
            }
        }
    }

    #[test]
    fn test_round_trip() {
        for o in group() {
            for r in CubeRotation::iter() {
                assert_eq!(o.rotate(r).rotate(r.inverse()).axes(), o.axes());
            }
        }
    }

    #[test]
    fn test_period_four() {
        for r in CubeRotation::iter() {
            let mut o = CubeOrientation::default();

            for _ in 0..4 {
                o = o.rotate(r);
            }

            assert_eq!(o.axes(), CubeOrientation::default().axes());
        }
    }

    #[test]
    fn test_identity_front_face() {
        assert_eq!(CubeOrientation::default().front_face(), (CubeFace::A, 0));
    }

    #[test]
    fn test_all_states_distinct() {
        let group = group();

        assert_eq!(group.len(), 24);

        let fronts: HashSet<_> = group.iter().map(|o| o.front_face()).collect();

        assert_eq!(fronts.len(), 24);
    }

    #[test]
    fn test_edge_rotations_at_identity() {
        use CubeRotation::*;

        let o = CubeOrientation::default();

        assert_eq!(o.top_rotation(), XCw);
        assert_eq!(o.bottom_rotation(), XCcw);
        assert_eq!(o.right_rotation(), YCw);
        assert_eq!(o.left_rotation(), YCcw);
    }

    #[test]
    fn test_neighbours_of_identity() {
        let o = CubeOrientation::default();

        assert_eq!(o.rotate(o.right_rotation()).front_face(), (CubeFace::B, 0));
        assert_eq!(o.rotate(o.left_rotation()).front_face(), (CubeFace::D, 0));
        assert_eq!(o.rotate(o.top_rotation()).front_face(), (CubeFace::C, 0));
        assert_eq!(o.rotate(o.bottom_rotation()).front_face(), (CubeFace::E, 0));
    }

    #[test]
    fn test_top_then_bottom_returns() {
        let o = CubeOrientation::default();

        let up = o.rotate(o.top_rotation());
        let back = up.rotate(up.bottom_rotation());

        assert_eq!(back.front_face(), (CubeFace::A, 0));
    }

    #[test]
    fn test_rolling_east_circles_the_cube() {
        let mut o = CubeOrientation::default();
        let mut seen = vec![];

        for _ in 0..4 {
            o = o.rotate(o.right_rotation());
            seen.push(o.front_face());
        }

        assert_eq!(
            seen,
            [
                (CubeFace::B, 0),
                (CubeFace::F, 2),
                (CubeFace::D, 0),
                (CubeFace::A, 0),
            ]
        );
    }

    #[test]
    fn test_history_records_rotations() {
        use CubeRotation::*;

        let o = CubeOrientation::default();

        assert!(o.history().is_empty());

        let o = o.rotate(XCw).rotate(YCcw);

        assert_eq!(o.history(), [XCw, YCcw]);
    }

    #[test]
    #[should_panic]
    fn test_rightward_rejects_bad_angle() {
        CubeFace::A.rightward(4);
    }
}
