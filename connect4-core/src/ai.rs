//! Minimax AI with alpha-beta pruning

use std::time::{Duration, Instant};

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::board::Board;
use crate::error::ConfigError;
use crate::eval::{evaluate, Heuristics};
use crate::game::{GameState, Player};
use crate::rules::{has_four_in_a_row, is_terminal};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Score of a won position; dominates every heuristic score
pub const WIN_SCORE: i32 = 9_999_999;

/// Plies of lookahead
pub const DEFAULT_DEPTH: u32 = 6;

/// Seed used by [`AlphaBetaAI::new`]
const DEFAULT_SEED: u64 = 42;

/// Nodes visited between deadline checks
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Chosen column and its minimax score
///
/// `column` is `None` when there is no move to make: the board is full or
/// already won. Callers must never apply a `None` column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub column: Option<usize>,
    pub score: i32,
}

impl SearchResult {
    pub fn no_move(score: i32) -> Self {
        Self { column: None, score }
    }

    pub fn is_no_move(&self) -> bool {
        self.column.is_none()
    }
}

/// Minimax score of one root column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnScore {
    pub column: usize,
    pub score: i32,
}

/// Counters for the most recent search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
    pub leaf_evaluations: u64,
    pub budget_exhausted: bool,
}

impl SearchStats {
    fn merge(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.cutoffs += other.cutoffs;
        self.leaf_evaluations += other.leaf_evaluations;
        self.budget_exhausted |= other.budget_exhausted;
    }
}

/// Optional caps on search effort. Once a cap is hit every unexpanded node
/// is scored as a leaf; the root is always expanded, even with a node
/// limit of zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchBudget {
    pub node_limit: Option<u64>,
    pub time_limit: Option<Duration>,
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Alpha-Beta AI player
pub struct AlphaBetaAI {
    pub depth: u32,
    pub heuristics: Heuristics,
    /// Always positive; see [`AlphaBetaAI::set_win_score`]
    win_score: i32,
    /// Seed each node's best column with a random legal column instead of
    /// the leftmost one
    pub randomize_ties: bool,
    pub budget: SearchBudget,
    rng: ChaCha8Rng,
    last_stats: SearchStats,
}

impl AlphaBetaAI {
    pub fn new(depth: u32, heuristics: Heuristics) -> Self {
        Self::with_seed(depth, heuristics, DEFAULT_SEED)
    }

    pub fn with_seed(depth: u32, heuristics: Heuristics, seed: u64) -> Self {
        Self {
            depth,
            heuristics,
            win_score: WIN_SCORE,
            randomize_ties: true,
            budget: SearchBudget::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            last_stats: SearchStats::default(),
        }
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn win_score(&self) -> i32 {
        self.win_score
    }

    /// Score of a won position; must be positive
    pub fn set_win_score(&mut self, win_score: i32) -> Result<(), ConfigError> {
        if win_score <= 0 {
            return Err(ConfigError::Validation(format!(
                "win_score must be > 0, got {}",
                win_score
            )));
        }
        self.win_score = win_score;
        Ok(())
    }

    /// Always seed with the leftmost legal column
    pub fn deterministic(mut self) -> Self {
        self.randomize_ties = false;
        self
    }

    /// Best move for `player` at the configured depth
    pub fn best_move(&mut self, board: &Board, player: Player) -> SearchResult {
        self.search(board, self.depth, player)
    }

    /// Best move for `player` looking `depth` plies ahead
    ///
    /// `player` is the maximizing side. The caller's board is not modified.
    pub fn search(&mut self, board: &Board, depth: u32, player: Player) -> SearchResult {
        let (params, rng) = self.split(player);
        let mut ctx = params.context(rng);
        let result = get_best_move(board, depth, &mut ctx);
        let stats = ctx.stats;

        tracing::debug!(
            "Search depth {} for {}: column {:?} score {} ({} nodes, {} cutoffs{})",
            depth,
            player.name(),
            result.column,
            result.score,
            stats.nodes,
            stats.cutoffs,
            if stats.budget_exhausted { ", budget exhausted" } else { "" }
        );

        self.last_stats = stats;
        result
    }

    /// Minimax score of every legal column for `player`
    ///
    /// Each root column is searched with a full window, so scores are exact
    /// and independent of evaluation order. Runs the columns on rayon when the
    /// `parallel` feature is enabled. Depth below one is treated as one.
    pub fn analyze(&mut self, board: &Board, player: Player) -> Vec<ColumnScore> {
        if is_terminal(board) {
            self.last_stats = SearchStats::default();
            return Vec::new();
        }

        let depth = self.depth.max(1);
        let columns = board.legal_columns();
        let (params, rng) = self.split(player);
        let seeds: Vec<u64> = columns.iter().map(|_| rng.gen()).collect();

        let run = |(&column, &seed): (&usize, &u64)| -> Option<(ColumnScore, SearchStats)> {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut ctx = params.context(&mut rng);
            let mut scratch = board.clone();
            scratch.drop_piece(column, player).ok()?;
            let score = minimax(&mut scratch, depth - 1, -params.win_score, params.win_score, false, &mut ctx).score;
            Some((ColumnScore { column, score }, ctx.stats))
        };

        #[cfg(feature = "parallel")]
        let scored: Vec<(ColumnScore, SearchStats)> = {
            use rayon::prelude::*;
            columns.par_iter().zip(seeds.par_iter()).filter_map(run).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let scored: Vec<(ColumnScore, SearchStats)> =
            columns.iter().zip(seeds.iter()).filter_map(run).collect();

        let mut stats = SearchStats::default();
        let mut scores = Vec::with_capacity(scored.len());
        for (score, child_stats) in scored {
            stats.merge(&child_stats);
            scores.push(score);
        }

        tracing::debug!(
            "Analyzed {} columns at depth {} for {} ({} nodes)",
            scores.len(),
            depth,
            player.name(),
            stats.nodes
        );

        self.last_stats = stats;
        scores
    }

    /// Play both sides until the game ends
    pub fn play_game(&mut self, initial: GameState) -> GameState {
        let mut state = initial;

        while !state.result().is_over() {
            let player = state.current_player();
            let Some(column) = self.best_move(state.board(), player).column else {
                break;
            };
            if state.play(column).is_err() {
                break;
            }
        }

        state
    }

    /// Static evaluation of a position
    pub fn evaluate(&self, board: &Board, player: Player) -> i32 {
        evaluate(board, player, &self.heuristics)
    }

    /// Counters from the most recent `search` or `analyze`
    pub fn last_stats(&self) -> SearchStats {
        self.last_stats
    }

    /// Borrow the search parameters and the RNG separately
    fn split(&mut self, player: Player) -> (SearchParams<'_>, &mut ChaCha8Rng) {
        let params = SearchParams {
            maximizer: player,
            heuristics: &self.heuristics,
            win_score: self.win_score,
            randomize_ties: self.randomize_ties,
            node_limit: self.budget.node_limit,
            deadline: self.budget.time_limit.map(|limit| Instant::now() + limit),
        };
        (params, &mut self.rng)
    }
}

/// Uniformly random legal column, or `None` on a full board
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    board.legal_columns().choose(rng).copied()
}

// ============================================================================
// SEARCH CONTEXT
// ============================================================================

#[derive(Clone, Copy)]
struct SearchParams<'a> {
    maximizer: Player,
    heuristics: &'a Heuristics,
    win_score: i32,
    randomize_ties: bool,
    node_limit: Option<u64>,
    deadline: Option<Instant>,
}

impl<'a> SearchParams<'a> {
    fn context(self, rng: &'a mut ChaCha8Rng) -> SearchContext<'a> {
        SearchContext {
            params: self,
            rng,
            stats: SearchStats::default(),
        }
    }
}

struct SearchContext<'a> {
    params: SearchParams<'a>,
    rng: &'a mut ChaCha8Rng,
    stats: SearchStats,
}

impl SearchContext<'_> {
    /// Initial "best" column before any child is compared
    fn seed_column(&mut self, columns: &[usize]) -> usize {
        if self.params.randomize_ties {
            columns[self.rng.gen_range(0..columns.len())]
        } else {
            columns[0]
        }
    }

    fn out_of_budget(&mut self) -> bool {
        if self.stats.budget_exhausted {
            return true;
        }

        let over_nodes = self
            .params
            .node_limit
            .map_or(false, |limit| self.stats.nodes > limit.max(1));
        let over_time = self.params.deadline.map_or(false, |deadline| {
            self.stats.nodes % DEADLINE_CHECK_INTERVAL == 0 && Instant::now() >= deadline
        });

        self.stats.budget_exhausted = over_nodes || over_time;
        self.stats.budget_exhausted
    }

    /// Score of a position searched no further
    fn leaf_score(&mut self, board: &Board) -> i32 {
        self.stats.leaf_evaluations += 1;
        let win = self.params.win_score;
        let maximizer = self.params.maximizer;

        if has_four_in_a_row(board, maximizer) {
            win
        } else if has_four_in_a_row(board, maximizer.opponent()) {
            -win
        } else if board.is_full() {
            0
        } else {
            evaluate(board, maximizer, self.params.heuristics).clamp(-win, win)
        }
    }
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

fn minimax(
    board: &mut Board,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    ctx: &mut SearchContext,
) -> SearchResult {
    ctx.stats.nodes += 1;

    if depth == 0 || is_terminal(board) || ctx.out_of_budget() {
        return SearchResult::no_move(ctx.leaf_score(board));
    }

    let columns = board.legal_columns();
    let mover = if maximizing {
        ctx.params.maximizer
    } else {
        ctx.params.maximizer.opponent()
    };

    let mut best_column = ctx.seed_column(&columns);
    let mut value = if maximizing {
        -ctx.params.win_score
    } else {
        ctx.params.win_score
    };

    for &column in &columns {
        let Ok(row) = board.drop_piece(column, mover) else {
            continue;
        };
        let score = minimax(board, depth - 1, alpha, beta, !maximizing, ctx).score;
        let undone = board.undo(column, row);
        debug_assert!(undone.is_ok(), "undo of ({}, {}) failed", row, column);

        if maximizing {
            if score > value {
                value = score;
                best_column = column;
            }
            alpha = alpha.max(value);
        } else {
            if score < value {
                value = score;
                best_column = column;
            }
            beta = beta.min(value);
        }

        if alpha >= beta {
            ctx.stats.cutoffs += 1;
            break;
        }
    }

    SearchResult {
        column: Some(best_column),
        score: value,
    }
}

fn get_best_move(board: &Board, depth: u32, ctx: &mut SearchContext) -> SearchResult {
    let columns = board.legal_columns();
    if columns.is_empty() || is_terminal(board) {
        return SearchResult::no_move(ctx.leaf_score(board));
    }

    let mut scratch = board.clone();
    let win = ctx.params.win_score;
    let result = minimax(&mut scratch, depth, -win, win, true, ctx);

    match result.column {
        Some(_) => result,
        // Depth 0 explores no children, so the seed column stands
        None => SearchResult {
            column: Some(ctx.seed_column(&columns)),
            score: result.score,
        },
    }
}

// ============================================================================
// TESTS
// ============================================================================
