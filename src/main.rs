use std::{
    cmp::max,
    collections::{HashMap, VecDeque},
    error::Error,
    fmt::Display,
    fs,
    num::TryFromIntError,
    ops::{Add, Index, Sub},
    str::FromStr,
};

use clap::Parser;
use itertools::Itertools;
use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, line_ending, multispace0},
    combinator::{all_consuming, map, map_res, value},
    error::Error as NomError,
    multi::{fold_many0, many0, many1},
    sequence::{separated_pair, terminated},
    IResult,
};
use num::{FromPrimitive, Unsigned};
use num_derive::FromPrimitive;
use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::cube::{CubeFace, CubeOrientation};

mod cube;

const fn is_int_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn unsigned<N: Unsigned + FromStr>(input: &str) -> IResult<&str, N> {
    map_res(take_while(is_int_digit), str::parse)(input)
}

#[derive(Clone, Copy, Debug)]
#[repr(i8)]
enum Rotate {
    Left = -1,
    Right = 1,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, EnumCount, EnumIter, Eq, FromPrimitive, PartialEq)]
enum Direction {
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

impl Direction {
    fn turn(self, rot: Rotate) -> Self {
        Self::from_isize((self as isize + rot as isize).rem_euclid(Self::COUNT as isize)).unwrap()
    }

    const fn versor(self) -> Point2 {
        use Direction::*;

        match self {
            North => Point2(0, -1),
            East => Point2(1, 0),
            South => Point2(0, 1),
            West => Point2(-1, 0),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Direction::*;

        match self {
            East => '>',
            South => 'v',
            West => '<',
            North => '^',
        }
        .fmt(f)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
struct Point2(i16, i16);

impl Add for Point2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(
            self.0.checked_add(rhs.0).unwrap(),
            self.1.checked_add(rhs.1).unwrap(),
        )
    }
}

impl Add<Direction> for Point2 {
    type Output = Self;

    fn add(self, rhs: Direction) -> Self::Output {
        self + rhs.versor()
    }
}

impl Sub for Point2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(
            self.0.checked_sub(rhs.0).unwrap(),
            self.1.checked_sub(rhs.1).unwrap(),
        )
    }
}

impl Display for Point2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self(x, y) = self;

        write!(f, "({x}, {y})")
    }
}

impl TryFrom<(usize, usize)> for Point2 {
    type Error = TryFromIntError;

    fn try_from((x, y): (usize, usize)) -> Result<Self, Self::Error> {
        Ok(Self(x.try_into()?, y.try_into()?))
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Material {
    #[default]
    Outside,
    Open,
    Wall,
}

impl Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Material::*;

        match self {
            Outside => ' ',
            Open => '.',
            Wall => '#',
        }
        .fmt(f)
    }
}

#[derive(Clone, Copy, Debug)]
struct Row<'a> {
    grid: &'a Grid,
    ix: usize,
}

impl Row<'_> {
    fn iter(&self) -> impl Iterator<Item = Material> + '_ {
        let (dim_w, _) = self.grid.dims();

        (0..dim_w).map(move |ix| self[ix])
    }

    fn start(&self) -> Option<Point2> {
        self.iter()
            .enumerate()
            .find(|&(_, m)| m != Material::Outside)
            .map(|(n, _)| {
                (n, self.ix)
                    .try_into()
                    .expect("this should never overflow an i16")
            })
    }
}

impl Index<usize> for Row<'_> {
    type Output = Material;

    fn index(&self, a: usize) -> &Self::Output {
        &self.grid[(a, self.ix)]
    }
}

#[derive(Debug)]
struct Grid {
    grid: Vec<Vec<Material>>,
    dim: (usize, usize),
}

impl Grid {
    fn new(mut grid: Vec<Vec<Material>>, dim_x: usize) -> Self {
        for row in &mut grid {
            row.resize(dim_x, Material::Outside);
        }

        let dim_y = grid.len();

        assert!(i16::try_from(dim_x).and(i16::try_from(dim_y)).is_ok());

        Self {
            grid,
            dim: (dim_x, dim_y),
        }
    }

    const fn dims(&self) -> (usize, usize) {
        self.dim
    }

    fn is_inside(&self, p @ Point2(x, y): Point2) -> bool {
        let (dim_x, dim_y) = (self.dims().0 as i16, self.dims().1 as i16);

        (0..dim_x).contains(&x) && (0..dim_y).contains(&y) && self[p] != Material::Outside
    }

    fn row(&self, ix: usize) -> Row<'_> {
        Row { grid: self, ix }
    }

    fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        let (_, dim_y) = self.dims();

        (0..dim_y).map(move |ix| self.row(ix))
    }
}

impl Index<Point2> for Grid {
    type Output = Material;

    fn index(&self, Point2(i, j): Point2) -> &Self::Output {
        &self[(i as usize, j as usize)]
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = Material;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.grid[j][i]
    }
}

fn region_of(Point2(x, y): Point2, side: i16) -> Point2 {
    Point2(x.div_euclid(side), y.div_euclid(side))
}

// side length of the cube: the map must cover exactly six squares of it
fn face_side(g: &Grid) -> i16 {
    let area: usize = g
        .rows()
        .map(|r| r.iter().filter(|&m| m != Material::Outside).count())
        .sum();

    let side = (1usize..).find(|n| n * n * 6 >= area).unwrap();

    assert_eq!(side * side * 6, area, "the map is not six face-sized squares");

    side.try_into().expect("this should never overflow an i16")
}

// the rotation that tips the cube over the named edge of the front face,
// bringing the neighbouring face in that direction to the front
fn roll(orientation: &CubeOrientation, towards: Direction) -> CubeOrientation {
    use Direction::*;

    let rotation = match towards {
        East => orientation.right_rotation(),
        South => orientation.bottom_rotation(),
        West => orientation.left_rotation(),
        North => orientation.top_rotation(),
    };

    orientation.rotate(rotation)
}

#[derive(Clone, Copy, Debug)]
struct Placement {
    region: Point2,
    angle: u8,
}

#[derive(Debug)]
struct Net {
    side: i16,

    // net region (in face-sized units) -> the attitude the cube had when the
    // folding walk first reached it
    regions: HashMap<Point2, CubeOrientation>,

    // where the net draws every face, and how far that drawing is turned
    // from the face's canonical layout
    faces: [Placement; CubeFace::COUNT],
}

impl Net {
    fn fold(g: &Grid) -> Self {
        let side = face_side(g);

        let origin = region_of(g.row(0).start().expect("top row is empty"), side);

        let mut regions = HashMap::new();
        let mut faces = [None; CubeFace::COUNT];
        let mut queue = VecDeque::from([(origin, CubeOrientation::default())]);

        while let Some((region, orientation)) = queue.pop_front() {
            if regions.contains_key(&region) {
                continue;
            }

            let (face, angle) = orientation.front_face();

            faces[face as usize] = Some(Placement { region, angle });

            for towards in Direction::iter() {
                let next = region + towards;

                if Self::covers(g, side, next) && !regions.contains_key(&next) {
                    queue.push_back((next, roll(&orientation, towards)));
                }
            }

            regions.insert(region, orientation);
        }

        let faces = faces.map(|p| p.expect("the map does not unfold all six faces"));

        Self {
            side,
            regions,
            faces,
        }
    }

    fn covers(g: &Grid, side: i16, region: Point2) -> bool {
        g.is_inside(Point2(region.0 * side, region.1 * side))
    }

    // advance one step, rolling onto the adjacent face when the step crosses
    // an edge of the current net region
    fn step(&self, Pos { pos, dir }: Pos) -> Pos {
        let side = self.side;
        let region = region_of(pos, side);

        let next = pos + dir;

        if region_of(next, side) == region {
            return Pos { pos: next, dir };
        }

        // where the step lands on the face we roll onto, in the frame of the
        // rolled cube: wrapped around to the opposite edge
        let Point2(u, v) = next - Point2(region.0 * side, region.1 * side);
        let entered = Point2(u.rem_euclid(side), v.rem_euclid(side));

        let orientation = &self.regions[&region];
        let (face, entry_angle) = roll(orientation, dir).front_face();
        let Placement {
            region: dest,
            angle,
        } = self.faces[face as usize];

        // the net draws `face` turned by `angle` while our frame is turned
        // by `entry_angle`: bridge the difference with quarter turns
        let turns = (entry_angle + 4 - angle) % 4;

        let Point2(u, v) = (0..turns).fold(entered, |Point2(u, v), _| Point2(side - 1 - v, u));
        let dir = (0..turns).fold(dir, |dir, _| dir.turn(Rotate::Right));

        Pos {
            pos: Point2(dest.0 * side + u, dest.1 * side + v),
            dir,
        }
    }
}

// advance one step with toroidal wraparound, skipping anything outside the
// map until we come back over it
fn flat_step(g: &Grid, Pos { mut pos, dir }: Pos) -> Pos {
    let (dim_x, dim_y) = g.dims();
    let (dim_x, dim_y) = (dim_x as i16, dim_y as i16);
    let Point2(dx, dy) = dir.versor();

    loop {
        pos = Point2(
            (pos.0 + dx).rem_euclid(dim_x),
            (pos.1 + dy).rem_euclid(dim_y),
        );

        if g.is_inside(pos) {
            return Pos { pos, dir };
        }
    }
}

// execute commands one at a time, returning the final position and a map of
// traversed positions and directions
fn walk(
    g: &Grid,
    start: Pos,
    cmds: &[Command],
    mut step: impl FnMut(Pos) -> Pos,
) -> (Pos, HashMap<Point2, Direction>) {
    let mut cur = start;
    let mut traversed = HashMap::from_iter([(cur.pos, cur.dir)]);

    for cmd in cmds {
        cur = match *cmd {
            Command::Forward(count) => {
                let mut reached = cur;

                for _ in 0..count {
                    traversed.insert(reached.pos, reached.dir);

                    let next = step(reached);

                    if g[next.pos] == Material::Wall {
                        // went face first into a wall, undo this last step
                        break;
                    }

                    reached = next;
                }

                reached
            }
            Command::Turn(rot) => cur.rotate(rot),
        };

        traversed.insert(cur.pos, cur.dir);
    }

    (cur, traversed)
}

fn spawn_in(g: &Grid) -> Option<Pos> {
    // the first open spot, scanning rows from the top coming from the west
    for (j, row) in g.rows().enumerate() {
        if let Some((i, _)) = row.iter().enumerate().find(|(_, m)| *m == Material::Open) {
            return Some(Pos {
                pos: (i, j).try_into().expect("map is too big"),
                dir: Direction::East,
            });
        }
    }

    None
}

fn dump_net(g: &Grid, net: &Net) {
    for face in CubeFace::iter() {
        let Placement { region, angle } = net.faces[face as usize];

        println!(
            "{face} @ {region} rot {angle}: {}",
            net.regions[&region].history().iter().format(" ")
        );
    }

    println!();

    let (dim_x, dim_y) = g.dims();

    for j in 0..dim_y {
        for i in 0..dim_x {
            let p: Point2 = (i, j).try_into().unwrap();

            if g.is_inside(p) {
                let region = region_of(p, net.side);

                let face = CubeFace::iter()
                    .find(|&face| net.faces[face as usize].region == region)
                    .expect("a tagged region");

                print!("{face}");
            } else {
                print!(" ");
            }
        }

        println!();
    }

    println!();
}

fn dump_map(g: &Grid, traversed: &HashMap<Point2, Direction>) {
    for (j, row) in g.rows().enumerate() {
        for (i, m) in row.iter().enumerate() {
            let p = (i, j).try_into().unwrap();

            if let Some(dir) = traversed.get(&p) {
                print!("{dir}");
            } else {
                print!("{m}");
            }
        }

        println!();
    }

    println!();
}

fn row(input: &str) -> IResult<&str, Vec<Material>> {
    use Material::*;

    terminated(
        many1(alt((
            value(Outside, char(' ')),
            value(Open, char('.')),
            value(Wall, char('#')),
        ))),
        line_ending,
    )(input)
}

fn grid(input: &str) -> IResult<&str, Grid> {
    map(
        fold_many0(
            row,
            || (0, Vec::new()),
            |(mut max_len, mut vec), cr| {
                max_len = max(max_len, cr.len());
                vec.push(cr);

                (max_len, vec)
            },
        ),
        |(dim_x, vec)| Grid::new(vec, dim_x),
    )(input)
}

#[derive(Clone, Copy, Debug)]
enum Command {
    Forward(usize),
    Turn(Rotate),
}

fn commands(input: &str) -> IResult<&str, Vec<Command>> {
    use Command::*;
    use Rotate::*;

    terminated(
        many0(alt((
            map(unsigned, Forward),
            value(Turn(Left), char('L')),
            value(Turn(Right), char('R')),
        ))),
        multispace0,
    )(input)
}

fn map_input(input: &str) -> IResult<&str, (Grid, Vec<Command>)> {
    all_consuming(terminated(
        separated_pair(grid, line_ending, commands),
        multispace0,
    ))(input)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Pos {
    pos: Point2,
    dir: Direction,
}

impl Pos {
    const fn eval(self) -> isize {
        let Self {
            pos: Point2(x, y),
            dir,
        } = self;

        let (x, y, dir) = (x as isize + 1, y as isize + 1, dir as isize);

        1000 * y + 4 * x + dir
    }

    fn rotate(self, rot: Rotate) -> Self {
        Self {
            pos: self.pos,
            dir: self.dir.turn(rot),
        }
    }
}

/// Walks a movement script over a grid that unfolds into a cube
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to parse
    file: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let Args { file } = Args::parse();

    // First step:
    // Map the entire input into a grid of Materials, where 'Outside' is the
    // space around the unfolded faces, plus a command list.
    let (g, cmds) = map_input(&fs::read_to_string(file)?)
        .map_err(|e| e.map(|e| NomError::new(e.input.to_string(), e.code)))?
        .1;

    let start = spawn_in(&g).ok_or("grid is degenerate: no open spots")?;

    // Second step:
    // Walk the script as if the map wrapped around a torus.
    let (flat, _) = walk(&g, start, &cmds, |p| flat_step(&g, p));

    println!("flat wrap: {flat:?}, password = {}", flat.eval());

    // Third step:
    // Fold the map back into a cube. Starting from the first region of the
    // top row, a search rolls an imaginary cube across the unfolded faces;
    // the orientation it reaches each region with tells which face the net
    // draws there, and at which rotation.
    let net = Net::fold(&g);

    dump_net(&g, &net);

    // Fourth step:
    // Walk the script again; when a step crosses the edge of a region, the
    // same rolling logic rehomes it onto the face the net glues there.
    let (cube, traversed) = walk(&g, start, &cmds, |p| net.step(p));

    dump_map(&g, &traversed);

    println!("cube wrap: {cube:?}, password = {}", cube.eval());

    Ok(())
}
