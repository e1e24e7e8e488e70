use statefold_core::PlannerConfig;
use statefold_mdp::{DeterministicDomain, DomainPlanner};
use tracing_subscriber::EnvFilter;

const WIDTH: i32 = 6;
const HEIGHT: i32 = 5;
const MOVES: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const MOVE_NAMES: [&str; 4] = ["up", "right", "down", "left"];

/// A walled grid where many move orders lead to the same cell, which is what
/// state aggregation exploits.
#[derive(Debug, Clone)]
struct GridMaze {
    walls: Vec<(i32, i32)>,
    start: (i32, i32),
    goal: (i32, i32),
}

impl Default for GridMaze {
    fn default() -> Self {
        //  S . . # . .
        //  . # . # . .
        //  . # . . . #
        //  . # # # . .
        //  . . . . . G
        Self {
            walls: vec![(3, 0), (1, 1), (3, 1), (1, 2), (5, 2), (1, 3), (2, 3), (3, 3)],
            start: (0, 0),
            goal: (5, 4),
        }
    }
}

impl GridMaze {
    fn render(&self, agent: (i32, i32)) -> String {
        let mut out = String::new();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let cell = if (x, y) == agent {
                    'A'
                } else if (x, y) == self.goal {
                    'G'
                } else if self.walls.contains(&(x, y)) {
                    '#'
                } else {
                    '.'
                };
                out.push(cell);
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }
}

impl DeterministicDomain for GridMaze {
    type State = (i32, i32);

    fn start_state(&self) -> Self::State {
        self.start
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        *state == self.goal
    }

    fn num_actions(&self, state: &Self::State) -> usize {
        if self.is_terminal(state) { 0 } else { MOVES.len() }
    }

    fn step(&self, state: &Self::State, action_id: usize) -> (Self::State, f64, bool) {
        let (dx, dy) = MOVES[action_id % MOVES.len()];
        let candidate = (state.0 + dx, state.1 + dy);
        let blocked = candidate.0 < 0
            || candidate.1 < 0
            || candidate.0 >= WIDTH
            || candidate.1 >= HEIGHT
            || self.walls.contains(&candidate);
        let next = if blocked { *state } else { candidate };

        if next == self.goal {
            (next, 1.0, true)
        } else {
            (next, 0.0, false)
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let maze = GridMaze::default();
    let config = PlannerConfig {
        budget: 800,
        gamma: 0.9,
        ..PlannerConfig::default()
    };
    let mut planner = DomainPlanner::new(maze.clone(), config).expect("valid planner config");

    let mut agent = maze.start_state();
    println!("{}", maze.render(agent));

    for turn in 1..=30 {
        let Some(action) = planner.act(&agent).expect("planning should succeed") else {
            break;
        };
        let (next, reward, done) = maze.step(&agent, action);
        agent = next;

        let tree = planner.planner().tree();
        println!(
            "turn {turn}: {} -> {:?} reward={reward} (tree nodes={}, states={})",
            MOVE_NAMES[action],
            agent,
            tree.node_count(),
            planner.interner().len()
        );
        if done {
            break;
        }
    }

    println!();
    println!("{}", maze.render(agent));
}
