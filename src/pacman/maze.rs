//! Maze grid
//!
//! Parsed from ASCII rows and mutated in place as dots are eaten. Lookups are
//! bounds-checked: rows whose edge tiles are open wrap horizontally (the side
//! tunnels), everything else off-grid reads as wall.

use std::fmt;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// One maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Wall,
    Dot,
    PowerPellet,
    /// Ghost-house door; only ghosts entering or leaving the house pass
    Door,
    Empty,
}

impl Tile {
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(Tile::Wall),
            '.' => Some(Tile::Dot),
            'o' => Some(Tile::PowerPellet),
            '-' => Some(Tile::Door),
            ' ' => Some(Tile::Empty),
            _ => None,
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Dot => '.',
            Tile::PowerPellet => 'o',
            Tile::Door => '-',
            Tile::Empty => ' ',
        }
    }

    #[inline]
    pub fn is_edible(&self) -> bool {
        matches!(self, Tile::Dot | Tile::PowerPellet)
    }
}

/// Grid direction (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    /// Tie-break order for ghost decisions
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

    pub fn delta(&self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Down => IVec2::new(0, 1),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
            Direction::Right => Direction::Left,
        }
    }
}

/// Why a layout could not be turned into a maze
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    Empty,
    RaggedRow { row: usize, expected: usize, found: usize },
    UnknownGlyph { row: usize, col: usize, glyph: char },
    /// A spawn/exit/home point sits on a wall
    Blocked { what: &'static str, x: i32, y: i32 },
    NoDots,
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::Empty => write!(f, "maze has no rows"),
            MazeError::RaggedRow { row, expected, found } => {
                write!(f, "row {row} is {found} tiles wide, expected {expected}")
            }
            MazeError::UnknownGlyph { row, col, glyph } => {
                write!(f, "unknown glyph {glyph:?} at row {row}, column {col}")
            }
            MazeError::Blocked { what, x, y } => write!(f, "{what} at ({x}, {y}) is inside a wall"),
            MazeError::NoDots => write!(f, "maze has nothing to eat"),
        }
    }
}

impl std::error::Error for MazeError {}

/// Mutable maze grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maze {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    /// Pristine copy for level resets
    initial: Vec<Tile>,
    /// Rows that wrap left/right
    wraps: Vec<bool>,
    dots_remaining: u32,
}

impl Maze {
    /// Parse ASCII rows (`#` wall, `.` dot, `o` power pellet, `-` door, space empty)
    pub fn parse(rows: &[&str]) -> Result<Self, MazeError> {
        let first = rows.first().ok_or(MazeError::Empty)?;
        let width = first.chars().count();
        if width == 0 {
            return Err(MazeError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        let mut wraps = Vec::with_capacity(rows.len());
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(MazeError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            let start = tiles.len();
            for (col, glyph) in line.chars().enumerate() {
                let tile = Tile::from_glyph(glyph).ok_or(MazeError::UnknownGlyph { row, col, glyph })?;
                tiles.push(tile);
            }
            wraps.push(tiles[start] != Tile::Wall && tiles[start + width - 1] != Tile::Wall);
        }

        let dots_remaining = tiles.iter().filter(|t| t.is_edible()).count() as u32;
        if dots_remaining == 0 {
            return Err(MazeError::NoDots);
        }

        Ok(Self {
            width: width as i32,
            height: rows.len() as i32,
            initial: tiles.clone(),
            tiles,
            wraps,
            dots_remaining,
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Dots and power pellets still on the board
    #[inline]
    pub fn dots_remaining(&self) -> u32 {
        self.dots_remaining
    }

    /// True if row `y` is a tunnel row
    pub fn row_wraps(&self, y: i32) -> bool {
        y >= 0 && y < self.height && self.wraps[y as usize]
    }

    /// Wrap a position horizontally on tunnel rows; other positions are returned unchanged
    pub fn wrap(&self, pos: IVec2) -> IVec2 {
        if self.row_wraps(pos.y) {
            IVec2::new(pos.x.rem_euclid(self.width), pos.y)
        } else {
            pos
        }
    }

    /// Offset from `a` to `b` in tile units, the short way round on tunnel rows
    pub fn separation(&self, a: Vec2, b: Vec2) -> Vec2 {
        let mut d = b - a;
        if self.row_wraps(a.y.floor() as i32) || self.row_wraps(b.y.floor() as i32) {
            let width = self.width as f32;
            d.x = d.x.rem_euclid(width);
            if d.x > width * 0.5 {
                d.x -= width;
            }
        }
        d
    }

    fn index(&self, pos: IVec2) -> Option<usize> {
        let pos = self.wrap(pos);
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    /// Tile at `pos`; off-grid reads as wall
    pub fn tile(&self, pos: IVec2) -> Tile {
        self.index(pos).map(|i| self.tiles[i]).unwrap_or(Tile::Wall)
    }

    /// Player can stand on anything but walls and doors
    pub fn player_can_enter(&self, pos: IVec2) -> bool {
        !matches!(self.tile(pos), Tile::Wall | Tile::Door)
    }

    /// Ghosts may cross doors only when `through_doors` is set
    pub fn ghost_can_enter(&self, pos: IVec2, through_doors: bool) -> bool {
        match self.tile(pos) {
            Tile::Wall => false,
            Tile::Door => through_doors,
            _ => true,
        }
    }

    /// Eat whatever is at `pos`, returning it (Empty if nothing edible)
    pub fn eat(&mut self, pos: IVec2) -> Tile {
        let Some(i) = self.index(pos) else {
            return Tile::Empty;
        };
        let tile = self.tiles[i];
        if tile.is_edible() {
            self.tiles[i] = Tile::Empty;
            self.dots_remaining -= 1;
            tile
        } else {
            Tile::Empty
        }
    }

    /// Restore every dot for the next level
    pub fn reset(&mut self) {
        self.tiles.clone_from(&self.initial);
        self.dots_remaining = self.tiles.iter().filter(|t| t.is_edible()).count() as u32;
    }

    /// Render back to ASCII rows (debug overlay, tests)
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.iter().map(Tile::glyph).collect())
            .collect()
    }
}

/// A maze plus the fixed points the game needs
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub name: &'static str,
    pub rows: &'static [&'static str],
    pub player_start: IVec2,
    /// Tile directly above the ghost-house door
    pub ghost_exit: IVec2,
    /// Tile inside the house where eaten ghosts revive
    pub ghost_home: IVec2,
    /// Blinky, Pinky, Inky, Clyde
    pub ghost_starts: [IVec2; 4],
    /// Tunnel rows slow ghosts within this many tiles of either edge
    pub tunnel_margin: i32,
}

impl Layout {
    /// Arcade maze (28 × 31)
    pub const CLASSIC: Layout = Layout {
        name: "classic",
        rows: &CLASSIC_ROWS,
        player_start: IVec2::new(13, 23),
        ghost_exit: IVec2::new(13, 11),
        ghost_home: IVec2::new(13, 14),
        ghost_starts: [
            IVec2::new(13, 11),
            IVec2::new(13, 14),
            IVec2::new(11, 14),
            IVec2::new(15, 14),
        ],
        tunnel_margin: 6,
    };

    /// Compact maze (19 × 15) from the pocket clone
    pub const MINI: Layout = Layout {
        name: "mini",
        rows: &MINI_ROWS,
        player_start: IVec2::new(9, 13),
        ghost_exit: IVec2::new(9, 7),
        ghost_home: IVec2::new(9, 9),
        ghost_starts: [
            IVec2::new(9, 7),
            IVec2::new(9, 9),
            IVec2::new(8, 9),
            IVec2::new(10, 9),
        ],
        tunnel_margin: 4,
    };

    pub fn by_name(name: &str) -> Option<Layout> {
        match name {
            "classic" => Some(Self::CLASSIC),
            "mini" => Some(Self::MINI),
            _ => None,
        }
    }

    /// Parse the rows and check the fixed points are open
    pub fn build(&self) -> Result<Maze, MazeError> {
        let maze = Maze::parse(self.rows)?;
        let check = |what: &'static str, pos: IVec2| {
            if maze.ghost_can_enter(pos, true) {
                Ok(())
            } else {
                Err(MazeError::Blocked { what, x: pos.x, y: pos.y })
            }
        };
        check("player start", self.player_start)?;
        check("ghost exit", self.ghost_exit)?;
        check("ghost home", self.ghost_home)?;
        for start in self.ghost_starts {
            check("ghost start", start)?;
        }
        Ok(maze)
    }

    #[inline]
    pub fn is_tunnel(&self, maze: &Maze, pos: IVec2) -> bool {
        maze.row_wraps(pos.y) && (pos.x < self.tunnel_margin || pos.x >= maze.width() - self.tunnel_margin)
    }
}

const CLASSIC_ROWS: [&str; 31] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "     #.## ###--### ##.#     ",
    "######.## #      # ##.######",
    "      .   #      #   .      ",
    "######.## #      # ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

const MINI_ROWS: [&str; 15] = [
    "###################",
    "#........#........#",
    "#o##.###.#.###.##o#",
    "#.................#",
    "#.##.#.#####.#.##.#",
    "#....#...#...#....#",
    "####.### # ###.####",
    "   #.#       #.#   ",
    "####.# ##-## #.####",
    "    .  #   #  .    ",
    "####.# ##### #.####",
    "#........#........#",
    "#.##.###...###.##.#",
    "#o....... .......o#",
    "###################",
];
