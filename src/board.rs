//! Board representation and move generation for 4x8 dark chess
//!
//! Square mapping: a1 = 0, b1 = 1, ..., d8 = 31 (square = rank * 4 + file).
//! All 32 pieces start face-down; a flip reveals the piece on a square and
//! the very first flip of a game decides which physical color each player
//! commands. Red renders lowercase, Black uppercase.

use std::fmt;
use std::ops::Not;

use thiserror::Error;

use crate::eval;
use crate::magic;
use crate::utils::{
    iter_bits, make_square, pop_lsb, square_bb, step_moves, Bitboard, FILE_NB, RANK_NB, SQUARE_NB,
};
use crate::zobrist;

/// Hashes remembered for repetition detection. A two-move shuffle cycle has
/// period 4, so the oldest held entry is exactly the hash 4 plies ago.
const REP_HISTORY: usize = 4;

/// Repetition count that forces a draw.
pub const REPETITION_LIMIT: u8 = 9;

/// Moves without a capture or flip that force a draw.
pub const NO_PROGRESS_LIMIT: u8 = 60;

/// Pieces of each kind per color at the start of a game.
pub const INITIAL_COUNTS: [u8; 7] = [5, 2, 2, 2, 2, 2, 1];

// ============================================================================
// VALUE TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red = 0,
    Black = 1,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::Red, Color::Black];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

/// Ranking: King > Guard > Minister > Rook > Knight > Cannon > Pawn,
/// with the pawn-takes-king exception and the cannon capturing by jump only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn = 0,
    Cannon = 1,
    Knight = 2,
    Rook = 3,
    Minister = 4,
    Guard = 5,
    King = 6,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::Pawn,
        PieceKind::Cannon,
        PieceKind::Knight,
        PieceKind::Rook,
        PieceKind::Minister,
        PieceKind::Guard,
        PieceKind::King,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    fn from_index(idx: u8) -> Option<PieceKind> {
        match idx {
            0 => Some(PieceKind::Pawn),
            1 => Some(PieceKind::Cannon),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Rook),
            4 => Some(PieceKind::Minister),
            5 => Some(PieceKind::Guard),
            6 => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Cannon => 'c',
            PieceKind::Knight => 'n',
            PieceKind::Rook => 'r',
            PieceKind::Minister => 'm',
            PieceKind::Guard => 'g',
            PieceKind::King => 'k',
        }
    }

    pub fn from_letter(c: char) -> Option<PieceKind> {
        match c {
            'p' => Some(PieceKind::Pawn),
            'c' => Some(PieceKind::Cannon),
            'n' => Some(PieceKind::Knight),
            'r' => Some(PieceKind::Rook),
            'm' => Some(PieceKind::Minister),
            'g' => Some(PieceKind::Guard),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// Packed piece: `(color << 4) | kind` for the 14 revealed combinations,
/// plus the face-down and empty singletons. The raw value never leaks;
/// constructors and accessors keep it inside the encoded ranges.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece(u8);

impl Piece {
    pub const DARK: Piece = Piece(39);
    pub const NONE: Piece = Piece(40);

    #[inline]
    pub fn new(color: Color, kind: PieceKind) -> Piece {
        Piece(((color as u8) << 4) | kind as u8)
    }

    #[inline]
    pub fn color(self) -> Option<Color> {
        match self.0 {
            0..=6 => Some(Color::Red),
            16..=22 => Some(Color::Black),
            _ => None,
        }
    }

    #[inline]
    pub fn kind(self) -> Option<PieceKind> {
        match self.0 {
            0..=6 | 16..=22 => PieceKind::from_index(self.0 & 15),
            _ => None,
        }
    }

    #[inline]
    pub fn is_dark(self) -> bool {
        self == Piece::DARK
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == Piece::NONE
    }

    #[inline]
    pub fn is_revealed(self) -> bool {
        self.0 <= 6 || (16..=22).contains(&self.0)
    }

    /// Canonical dense index: Red kinds 0..=6, Black kinds 7..=13,
    /// face-down 14, empty 15. Bijective on the encoded domain.
    #[inline]
    pub fn index(self) -> usize {
        match self.0 {
            0..=6 => self.0 as usize,
            16..=22 => self.0 as usize - 9,
            39 => 14,
            _ => 15,
        }
    }

    /// Inverse of [`Piece::index`].
    pub fn from_index(idx: usize) -> Piece {
        match idx {
            0..=6 => Piece(idx as u8),
            7..=13 => Piece(idx as u8 + 9),
            14 => Piece::DARK,
            _ => Piece::NONE,
        }
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Piece({})", piece_char(*self))
    }
}

/// Packed move: `(from << 5) | to`, with `from == to` encoding a flip.
/// The two sentinels sit above every legal encoding (max 1023).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    pub const PASS: Move = Move(1024);
    pub const NONE: Move = Move(1025);

    #[inline]
    pub fn new(from: usize, to: usize) -> Move {
        debug_assert!(from < SQUARE_NB && to < SQUARE_NB);
        Move(((from as u16) << 5) | to as u16)
    }

    #[inline]
    pub fn from_sq(self) -> usize {
        ((self.0 >> 5) & 31) as usize
    }

    #[inline]
    pub fn to_sq(self) -> usize {
        (self.0 & 31) as usize
    }

    /// True for every (from, to) encoding, false for the sentinels.
    #[inline]
    pub fn is_real(self) -> bool {
        self.0 < 1024
    }

    #[inline]
    pub fn is_flip(self) -> bool {
        self.is_real() && self.from_sq() == self.to_sq()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Move::PASS {
            write!(f, "pass")
        } else if *self == Move::NONE {
            write!(f, "none")
        } else {
            write!(f, "{} {}", square_name(self.from_sq()), square_name(self.to_sq()))
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    RedPlay,
    BlackPlay,
    RedWin,
    BlackWin,
    Draw,
}

impl Status {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::RedWin | Status::BlackWin | Status::Draw)
    }

    #[inline]
    pub fn winner(self) -> Option<Color> {
        match self {
            Status::RedWin => Some(Color::Red),
            Status::BlackWin => Some(Color::Black),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("expected a real move, got {0}")]
    ExpectedRealMove(Move),
    #[error("expected a flip move, got {0}")]
    ExpectedFlip(Move),
    #[error("no movable piece behind {0}")]
    NoMovablePiece(Move),
    #[error("piece behind {0} does not belong to the side to move")]
    WrongSide(Move),
    #[error("{0} does not address a face-down piece")]
    NotFaceDown(Move),
    #[error("malformed position string: {0}")]
    InvalidFen(String),
}

// ============================================================================
// TEXT HELPERS
// ============================================================================

/// Coordinate name: column letter 'a'..'d' plus 1-based row.
pub fn square_name(sq: usize) -> String {
    let file = (b'a' + (sq & 3) as u8) as char;
    format!("{}{}", file, (sq >> 2) + 1)
}

/// Two-character token `[a-dA-D][1-8]`.
pub fn parse_square(token: &str) -> Option<usize> {
    let mut chars = token.chars();
    let file = chars.next()?.to_ascii_lowercase();
    let rank = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    if !('a'..='d').contains(&file) || !('1'..='8').contains(&rank) {
        return None;
    }
    Some(make_square(
        file as usize - 'a' as usize,
        rank as usize - '1' as usize,
    ))
}

/// Single case-sensitive piece letter: the letter picks the kind, the case
/// picks the color (lowercase Red).
pub fn parse_piece(token: &str) -> Option<(Color, PieceKind)> {
    let mut chars = token.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let color = if c.is_ascii_lowercase() {
        Color::Red
    } else {
        Color::Black
    };
    let kind = PieceKind::from_letter(c.to_ascii_lowercase())?;
    Some((color, kind))
}

pub fn piece_char(pc: Piece) -> char {
    if pc.is_dark() {
        return 'X';
    }
    match (pc.color(), pc.kind()) {
        (Some(Color::Red), Some(k)) => k.letter(),
        (Some(Color::Black), Some(k)) => k.letter().to_ascii_uppercase(),
        _ => ' ',
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Full game state. Kept `Copy` on purpose: the search copies the board at
/// every node instead of carrying an unmake path.
#[derive(Clone, Copy)]
pub struct Board {
    squares: [Piece; SQUARE_NB],
    by_kind: [Bitboard; 7],
    by_color: [Bitboard; 2],
    dark_bb: Bitboard,
    all_bb: Bitboard,
    /// Revealed pieces currently on the board, by canonical index 0..14.
    counts: [u8; 14],
    /// Pieces ever revealed by a flip, by canonical index. Never decremented;
    /// feeds the hidden-identity weights in the search.
    revealed: [u8; 14],
    side: Option<Color>,
    status: Status,
    ply: u16,
    no_progress: u8,
    repetition: u8,
    hash: u64,
    history: [u64; REP_HISTORY],
    hist_len: u8,
    scores: [i32; 2],
}

impl Board {
    /// Fresh game: every square face-down, mover undetermined until the
    /// first flip.
    pub fn new() -> Board {
        let mut board = Board {
            squares: [Piece::NONE; SQUARE_NB],
            by_kind: [0; 7],
            by_color: [0; 2],
            dark_bb: 0,
            all_bb: 0,
            counts: [0; 14],
            revealed: [0; 14],
            side: None,
            status: Status::RedPlay,
            ply: 0,
            no_progress: 0,
            repetition: 0,
            hash: 0,
            history: [0; REP_HISTORY],
            hist_len: 0,
            scores: [0; 2],
        };
        board.reset();
        board
    }

    pub fn reset(&mut self) {
        self.clear();
        for sq in 0..SQUARE_NB {
            self.put_piece(Piece::DARK, sq);
        }
        self.refresh_scores();
    }

    fn clear(&mut self) {
        self.squares = [Piece::NONE; SQUARE_NB];
        self.by_kind = [0; 7];
        self.by_color = [0; 2];
        self.dark_bb = 0;
        self.all_bb = 0;
        self.counts = [0; 14];
        self.revealed = [0; 14];
        self.side = None;
        self.status = Status::RedPlay;
        self.ply = 0;
        self.no_progress = 0;
        self.repetition = 0;
        self.hash = 0;
        self.history = [0; REP_HISTORY];
        self.hist_len = 0;
        self.scores = [0; 2];
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    #[inline]
    pub fn piece_on(&self, sq: usize) -> Piece {
        self.squares[sq]
    }

    #[inline]
    pub fn side_to_move(&self) -> Option<Color> {
        self.side
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn ply(&self) -> u16 {
        self.ply
    }

    #[inline]
    pub fn no_progress(&self) -> u8 {
        self.no_progress
    }

    #[inline]
    pub fn repetition(&self) -> u8 {
        self.repetition
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.all_bb
    }

    #[inline]
    pub fn dark_bb(&self) -> Bitboard {
        self.dark_bb
    }

    #[inline]
    pub fn dark_count(&self) -> u32 {
        self.dark_bb.count_ones()
    }

    #[inline]
    pub fn color_bb(&self, c: Color) -> Bitboard {
        self.by_color[c.index()]
    }

    #[inline]
    pub fn kind_bb(&self, k: PieceKind) -> Bitboard {
        self.by_kind[k.index()]
    }

    #[inline]
    pub fn pieces_of(&self, c: Color, k: PieceKind) -> Bitboard {
        self.by_color[c.index()] & self.by_kind[k.index()]
    }

    /// Revealed pieces of `pc`'s identity currently on the board.
    #[inline]
    pub fn count(&self, pc: Piece) -> u8 {
        debug_assert!(pc.is_revealed());
        self.counts[pc.index()]
    }

    /// Pieces of this identity still face-down somewhere on the board.
    #[inline]
    pub fn remaining_unrevealed(&self, pc: Piece) -> u8 {
        debug_assert!(pc.is_revealed());
        let kind = pc.index() % 7;
        INITIAL_COUNTS[kind].saturating_sub(self.revealed[pc.index()])
    }

    /// Cached material/threat score for one color (see [`crate::eval`]).
    #[inline]
    pub fn cached_score(&self, c: Color) -> i32 {
        self.scores[c.index()]
    }

    /// From-scratch Zobrist recomputation; the incrementally maintained
    /// hash must always match.
    pub fn recalc_hash(&self) -> u64 {
        zobrist::recalc(self)
    }

    // ------------------------------------------------------------------
    // Primitive mutations: bitboards, counts and hash move together
    // ------------------------------------------------------------------

    fn put_piece(&mut self, pc: Piece, sq: usize) {
        debug_assert!(self.squares[sq].is_none());
        debug_assert!(!pc.is_none());
        let bb = square_bb(sq);
        self.squares[sq] = pc;
        self.all_bb ^= bb;
        if pc.is_dark() {
            self.dark_bb ^= bb;
        } else if let (Some(c), Some(k)) = (pc.color(), pc.kind()) {
            self.by_color[c.index()] ^= bb;
            self.by_kind[k.index()] ^= bb;
            self.counts[pc.index()] += 1;
        }
        self.hash ^= zobrist::piece_key(pc, sq);
    }

    fn remove_piece(&mut self, pc: Piece, sq: usize) {
        debug_assert!(self.squares[sq] == pc);
        let bb = square_bb(sq);
        self.squares[sq] = Piece::NONE;
        self.all_bb ^= bb;
        if pc.is_dark() {
            self.dark_bb ^= bb;
        } else if let (Some(c), Some(k)) = (pc.color(), pc.kind()) {
            self.by_color[c.index()] ^= bb;
            self.by_kind[k.index()] ^= bb;
            self.counts[pc.index()] -= 1;
        }
        self.hash ^= zobrist::piece_key(pc, sq);
    }

    fn shift_piece(&mut self, pc: Piece, from: usize, to: usize) {
        debug_assert!(pc.is_revealed());
        debug_assert!(self.squares[to].is_none());
        let from_to = square_bb(from) | square_bb(to);
        self.squares[from] = Piece::NONE;
        self.squares[to] = pc;
        self.all_bb ^= from_to;
        if let (Some(c), Some(k)) = (pc.color(), pc.kind()) {
            self.by_color[c.index()] ^= from_to;
            self.by_kind[k.index()] ^= from_to;
        }
        self.hash ^= zobrist::piece_key(pc, from) ^ zobrist::piece_key(pc, to);
    }

    /// Change the side to move, keeping the turn key folded into the hash
    /// exactly when Black is to move.
    fn set_side(&mut self, side: Option<Color>) {
        if self.side == Some(Color::Black) {
            self.hash ^= zobrist::turn_key();
        }
        self.side = side;
        if self.side == Some(Color::Black) {
            self.hash ^= zobrist::turn_key();
        }
    }

    fn toggle_side(&mut self) {
        if let Some(c) = self.side {
            self.set_side(Some(!c));
        }
    }

    fn refresh_scores(&mut self) {
        for c in Color::BOTH {
            self.scores[c.index()] = eval::material_score(&self.counts, c);
        }
    }

    fn push_history(&mut self) {
        let h = self.hash;
        if (self.hist_len as usize) < REP_HISTORY {
            self.history[self.hist_len as usize] = h;
            self.hist_len += 1;
            return;
        }
        if self.history[0] == h {
            self.repetition += 1;
        }
        self.history.copy_within(1.., 0);
        self.history[REP_HISTORY - 1] = h;
    }

    fn refresh_status(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        if self.no_progress >= NO_PROGRESS_LIMIT || self.repetition >= REPETITION_LIMIT {
            self.status = Status::Draw;
            return;
        }
        if self.dark_bb == 0 {
            if self.by_color[Color::Red.index()] == 0 {
                self.status = Status::BlackWin;
                return;
            }
            if self.by_color[Color::Black.index()] == 0 {
                self.status = Status::RedWin;
                return;
            }
        }
        self.status = match self.side {
            Some(Color::Black) => Status::BlackPlay,
            _ => Status::RedPlay,
        };
    }

    /// Resolve terminal-by-no-moves. The search layer calls this after
    /// generation; a position where both colors still have pieces but the
    /// mover has no action at all is a draw.
    pub fn update_status(&mut self, legal_moves: usize) {
        self.refresh_status();
        if self.status.is_terminal() {
            return;
        }
        if self.dark_bb == 0 && legal_moves == 0 {
            self.status = Status::Draw;
        }
    }

    // ------------------------------------------------------------------
    // Game mutations
    // ------------------------------------------------------------------

    /// Apply a normal or capture move, returning the captured piece if any.
    /// `Move::PASS` only passes the turn. Flip encodings are rejected:
    /// reveals go through [`Board::apply_flip`].
    pub fn apply_move(&mut self, m: Move) -> Result<Option<Piece>, BoardError> {
        if m == Move::PASS {
            self.toggle_side();
            self.ply += 1;
            self.refresh_status();
            return Ok(None);
        }
        if !m.is_real() {
            return Err(BoardError::ExpectedRealMove(m));
        }
        if m.is_flip() {
            return Err(BoardError::ExpectedRealMove(m));
        }

        let from = m.from_sq();
        let to = m.to_sq();
        let pc = self.squares[from];
        let color = pc.color().ok_or(BoardError::NoMovablePiece(m))?;
        if Some(color) != self.side {
            return Err(BoardError::WrongSide(m));
        }

        let captured = self.squares[to];
        let capture = !captured.is_none();
        if capture {
            self.remove_piece(captured, to);
        }
        self.shift_piece(pc, from, to);
        self.toggle_side();
        self.ply += 1;
        if capture {
            self.no_progress = 0;
        } else {
            self.no_progress = self.no_progress.saturating_add(1);
        }
        self.refresh_scores();
        self.push_history();
        self.refresh_status();

        Ok(if capture { Some(captured) } else { None })
    }

    /// Reveal the face-down piece addressed by the flip move `m` as
    /// `kind`/`color`. The first flip of a game fixes the side-to-move
    /// assignment: whoever flipped owns the revealed color.
    pub fn apply_flip(&mut self, m: Move, kind: PieceKind, color: Color) -> Result<(), BoardError> {
        if !m.is_flip() {
            return Err(BoardError::ExpectedFlip(m));
        }
        let sq = m.from_sq();
        if !self.squares[sq].is_dark() {
            return Err(BoardError::NotFaceDown(m));
        }

        self.remove_piece(Piece::DARK, sq);
        let pc = Piece::new(color, kind);
        self.put_piece(pc, sq);
        self.revealed[pc.index()] = self.revealed[pc.index()].saturating_add(1);

        if self.side.is_none() {
            self.set_side(Some(color));
        }
        self.toggle_side();
        self.ply += 1;
        self.no_progress = 0;
        self.refresh_scores();
        self.push_history();
        self.refresh_status();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Move generation
    // ------------------------------------------------------------------

    /// One-step moves of every revealed kind onto empty squares.
    pub fn normal_moves(&self, us: Color) -> Vec<Move> {
        let mut list = Vec::with_capacity(32);
        let empty = !self.all_bb;
        for k in PieceKind::ALL {
            let mut b = self.pieces_of(us, k);
            while let Some(from) = pop_lsb(&mut b) {
                let mut dest = step_moves(from) & empty;
                while let Some(to) = pop_lsb(&mut dest) {
                    list.push(Move::new(from, to));
                }
            }
        }
        list
    }

    /// Enemy squares a piece of `kind` may take by stepping onto them.
    /// The cannon never captures by adjacency; its jumps are generated
    /// separately through the magic tables.
    fn capture_targets(&self, us: Color, kind: PieceKind) -> Bitboard {
        let them = !us;
        match kind {
            PieceKind::Pawn => {
                self.pieces_of(them, PieceKind::King) | self.pieces_of(them, PieceKind::Pawn)
            }
            PieceKind::Cannon => 0,
            PieceKind::Knight => {
                self.pieces_of(them, PieceKind::Knight)
                    | self.pieces_of(them, PieceKind::Cannon)
                    | self.pieces_of(them, PieceKind::Pawn)
            }
            PieceKind::Rook => {
                self.pieces_of(them, PieceKind::Rook)
                    | self.pieces_of(them, PieceKind::Knight)
                    | self.pieces_of(them, PieceKind::Cannon)
                    | self.pieces_of(them, PieceKind::Pawn)
            }
            PieceKind::Minister => {
                self.color_bb(them)
                    & !(self.pieces_of(them, PieceKind::King)
                        | self.pieces_of(them, PieceKind::Guard))
            }
            PieceKind::Guard => self.color_bb(them) & !self.pieces_of(them, PieceKind::King),
            PieceKind::King => self.color_bb(them) & !self.pieces_of(them, PieceKind::Pawn),
        }
    }

    /// Adjacency captures plus cannon jump captures.
    pub fn capture_moves(&self, us: Color) -> Vec<Move> {
        let mut list = Vec::with_capacity(16);
        let them = !us;
        for k in PieceKind::ALL {
            let mut b = self.pieces_of(us, k);
            if b == 0 {
                continue;
            }
            let targets = self.capture_targets(us, k);
            while let Some(from) = pop_lsb(&mut b) {
                let mut dest = if k == PieceKind::Cannon {
                    magic::cannon_attacks(from, self.all_bb) & self.color_bb(them)
                } else {
                    step_moves(from) & targets
                };
                while let Some(to) = pop_lsb(&mut dest) {
                    list.push(Move::new(from, to));
                }
            }
        }
        list
    }

    /// Normal and capture moves for one side, one list.
    pub fn legal_moves(&self, us: Color) -> Vec<Move> {
        let mut list = self.normal_moves(us);
        list.extend(self.capture_moves(us));
        list
    }

    /// One flip move per face-down square.
    pub fn flip_moves(&self) -> Vec<Move> {
        iter_bits(self.dark_bb).map(|sq| Move::new(sq, sq)).collect()
    }

    // ------------------------------------------------------------------
    // Text I/O
    // ------------------------------------------------------------------

    /// 8x4 grid, rank 8 on top. Lowercase Red, uppercase Black, X face-down.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(256);
        out.push_str("   a | b | c | d |\n");
        for rank in (0..RANK_NB).rev() {
            out.push_str(&format!("{} ", rank + 1));
            for file in 0..FILE_NB {
                let pc = self.squares[make_square(file, rank)];
                out.push(' ');
                out.push(piece_char(pc));
                out.push_str(" |");
            }
            out.push('\n');
        }
        out
    }

    /// Load a position: ranks 8 down to 1 separated by '/', piece letters
    /// (lowercase Red, uppercase Black), 'x' for a face-down piece, digits
    /// for runs of empty squares; then the side to move ("r", "b" or "-"
    /// before the first flip) and optionally the ply count.
    pub fn set_from_fen(&mut self, fen: &str) -> Result<(), BoardError> {
        let bad = |msg: &str| BoardError::InvalidFen(msg.to_string());
        let mut parts = fen.split_whitespace();
        let placement = parts.next().ok_or_else(|| bad("missing placement"))?;

        self.clear();
        let mut sq = make_square(0, RANK_NB - 1);
        for ch in placement.chars() {
            match ch {
                '/' => {
                    sq = sq.checked_sub(2 * FILE_NB).ok_or_else(|| bad("too many ranks"))?;
                }
                '1'..='8' => {
                    sq += ch as usize - '0' as usize;
                }
                'x' | 'X' => {
                    if sq >= SQUARE_NB {
                        return Err(bad("placement overruns the board"));
                    }
                    self.put_piece(Piece::DARK, sq);
                    sq += 1;
                }
                _ => {
                    let (color, kind) =
                        parse_piece(&ch.to_string()).ok_or_else(|| bad("unknown piece letter"))?;
                    if sq >= SQUARE_NB {
                        return Err(bad("placement overruns the board"));
                    }
                    self.put_piece(Piece::new(color, kind), sq);
                    sq += 1;
                }
            }
        }

        match parts.next() {
            Some("r") => self.set_side(Some(Color::Red)),
            Some("b") => self.set_side(Some(Color::Black)),
            Some("-") | None => self.set_side(None),
            Some(other) => return Err(bad(&format!("unknown side token '{other}'"))),
        }

        if let Some(token) = parts.next() {
            self.ply = token
                .parse()
                .map_err(|_| bad("ply count is not a number"))?;
        }

        // A loaded position carries no flip log; seed the reveal table from
        // what is visible so the hidden-identity weights stay in range.
        self.revealed = self.counts;
        self.refresh_scores();
        self.refresh_status();
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
