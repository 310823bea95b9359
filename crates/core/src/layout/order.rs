//! Reading order over paragraphs, after Breuel.
//!
//! `a` precedes `b` when they overlap in x and `a` sits higher (rule 1), or
//! when `a` lies wholly left of `b` and no paragraph vertically between them
//! spans both (rule 2). The resulting DAG is sorted depth-first; unrelated
//! paragraphs keep their input order.

use crate::geometry::{Rect, cmp_f64};

use super::paragraph::Paragraph;

fn x_overlap(a: &Rect, b: &Rect) -> bool {
    a.llx <= b.urx && b.llx <= a.urx
}

/// Rule 1: overlapping columns, `a` above `b`.
fn above(a: &Rect, b: &Rect) -> bool {
    x_overlap(a, b) && a.lly > b.lly
}

/// Rule 2: `a` left of `b` with nothing between them bridging both.
fn left_of(a: &Rect, b: &Rect, all: &[Rect]) -> bool {
    if a.urx >= b.llx {
        return false;
    }
    let lo = a.lly.min(b.lly);
    let hi = a.lly.max(b.lly);
    !all
        .iter()
        .any(|c| lo < c.lly && c.lly < hi && x_overlap(a, c) && x_overlap(b, c))
}

/// Successor lists of the ordering DAG over `boxes`.
pub(crate) fn precedence(boxes: &[Rect]) -> Vec<Vec<usize>> {
    let n = boxes.len();
    let mut after = vec![Vec::new(); n];
    for i in 0..n {
        for j in 0..n {
            if i != j && (above(&boxes[i], &boxes[j]) || left_of(&boxes[i], &boxes[j], boxes)) {
                after[i].push(j);
            }
        }
    }
    after
}

/// Topological order of the DAG: depth-first post-order, reversed. Roots
/// and successors are visited last-first so ties come out in index order.
pub(crate) fn topo_order(after: &[Vec<usize>]) -> Vec<usize> {
    let n = after.len();
    let mut visited = vec![false; n];
    let mut post = Vec::with_capacity(n);
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in (0..n).rev() {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        stack.push((root, after[root].len()));
        while let Some(top) = stack.last_mut() {
            let node = top.0;
            if top.1 == 0 {
                stack.pop();
                post.push(node);
                continue;
            }
            top.1 -= 1;
            let next = after[node][top.1];
            if !visited[next] {
                visited[next] = true;
                stack.push((next, after[next].len()));
            }
        }
    }
    post.reverse();
    post
}

/// Sorts paragraphs into reading order.
///
/// Input is first sorted top to bottom then left to right, which fixes the
/// order of paragraphs the rules leave unrelated. Extended bboxes drive
/// the comparisons.
pub fn order_paragraphs(mut paras: Vec<Paragraph>) -> Vec<Paragraph> {
    paras.sort_by(|a, b| {
        cmp_f64(b.bbox().ury, a.bbox().ury).then(cmp_f64(a.bbox().llx, b.bbox().llx))
    });
    let boxes: Vec<Rect> = paras.iter().map(Paragraph::ebbox).collect();
    let order = topo_order(&precedence(&boxes));
    let mut slots: Vec<Option<Paragraph>> = paras.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}
