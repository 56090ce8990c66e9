//! Value Iteration and Policy Iteration solve the same fixed point
//!
//! Both solvers may pick different but equally valued actions where Q ties,
//! so agreement is checked on action values, not raw action identity, on
//! every state reachable under either trained policy.

use std::collections::{HashSet, VecDeque};

use ttt_mdp::{
    Policy, RewardConfig, TttMdp,
    solvers::{
        PolicyIterationAgent, PolicyIterationConfig, ValueIterationAgent, ValueIterationConfig,
        ValueTable,
    },
    tictactoe::{BoardState, Move},
};

fn q_value(
    mdp: &TttMdp,
    values: &ValueTable,
    state: &BoardState,
    position: usize,
    discount: f64,
) -> f64 {
    let action = Move {
        position,
        player: state.to_move,
    };
    mdp.generate_transitions(state, &action)
        .expect("legal action")
        .iter()
        .map(|tp| tp.prob * (tp.outcome.local_reward + discount * values[&tp.outcome.next_state]))
        .sum()
}

/// Decision states reachable when X follows `policy` and O replies freely
fn reachable_under(mdp: &TttMdp, policy: &Policy) -> HashSet<BoardState> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([BoardState::new()]);

    while let Some(state) = queue.pop_front() {
        if !seen.insert(state) || state.is_terminal() {
            continue;
        }
        let chosen = policy.action_for(&state).expect("policy covers state");
        for tp in mdp.generate_transitions(&state, &chosen).unwrap() {
            if !seen.contains(&tp.outcome.next_state) {
                queue.push_back(tp.outcome.next_state);
            }
        }
    }

    seen
}

#[test]
fn solvers_agree_on_reachable_states() {
    let mdp = TttMdp::new(RewardConfig::default()).unwrap();

    let mut vi = ValueIterationAgent::new(mdp, ValueIterationConfig::default()).unwrap();
    let vi_policy = vi.train().unwrap();

    let mut pi =
        PolicyIterationAgent::new(mdp, PolicyIterationConfig::default().with_seed(123)).unwrap();
    let pi_policy = pi.train().unwrap();

    assert_eq!(vi_policy.len(), pi_policy.len());

    let mut reachable = reachable_under(&mdp, &vi_policy);
    reachable.extend(reachable_under(&mdp, &pi_policy));

    let mut compared = 0;
    for state in &reachable {
        if state.is_terminal() {
            continue;
        }
        let vi_choice = vi_policy.action_for(state).unwrap();
        let pi_choice = pi_policy.action_for(state).unwrap();

        // Both choices must be optimal against the converged optimal values.
        let q_vi = q_value(&mdp, vi.values(), state, vi_choice.position, 0.9);
        let q_pi = q_value(&mdp, vi.values(), state, pi_choice.position, 0.9);
        assert!(
            (q_vi - q_pi).abs() < 1e-6,
            "solvers disagree at {}: VI plays {} (Q={q_vi}), PI plays {} (Q={q_pi})",
            state.encode(),
            vi_choice.position,
            pi_choice.position
        );
        compared += 1;
    }

    assert!(compared > 0, "no states compared");
}

#[test]
fn both_solvers_never_lose_as_first_player() {
    // Against every possible opponent line of play, an optimal X policy
    // never reaches a state where O has won.
    let mdp = TttMdp::new(RewardConfig::default()).unwrap();

    let mut vi = ValueIterationAgent::new(mdp, ValueIterationConfig::default()).unwrap();
    let vi_policy = vi.train().unwrap();

    let mut pi =
        PolicyIterationAgent::new(mdp, PolicyIterationConfig::default().with_seed(7)).unwrap();
    let pi_policy = pi.train().unwrap();

    for policy in [&vi_policy, &pi_policy] {
        for state in reachable_under(&mdp, policy) {
            assert_ne!(
                state.winner(),
                Some(ttt_mdp::tictactoe::Player::O),
                "policy allowed a loss at {}",
                state.encode()
            );
        }
    }
}
