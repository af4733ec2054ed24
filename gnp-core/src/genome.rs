//! Individual / Network genome (§3, §4.2).
//!
//! Each individual is a small directed graph: `P` start nodes that only
//! carry a `next` pointer, and `J` judgment nodes that each carry
//! `(attribute, next, delay)`. Genes are mutated in a struct-of-arrays layout
//! (`JudgeGenes`) because the evolution operators in §4.6 touch one field at
//! a time across many individuals; [`Individual::copy_genes_to_nodes`]
//! flattens them into the array-of-structs view ([`JudgeNode`]) the
//! evaluation kernel walks, which is friendlier to the cache in the kernel's
//! inner loop (the same AoS-for-hot-path rationale as `ndarray::Array2` rows
//! in the teacher's population buffer).

use rand::Rng;

/// Struct-of-arrays storage for judgment node genes, indexed `0..J`.
#[derive(Debug, Clone)]
pub struct JudgeGenes {
    pub attr: Vec<usize>,
    pub next: Vec<usize>,
    pub delay: Vec<usize>,
}

impl JudgeGenes {
    fn init_random<R: Rng + ?Sized>(j: usize, a: usize, p: usize, d_max: usize, rng: &mut R) -> Self {
        let mut attr = Vec::with_capacity(j);
        let mut next = Vec::with_capacity(j);
        let mut delay = Vec::with_capacity(j);
        for _ in 0..j {
            attr.push(rng.random_range(0..a));
            next.push(rng.random_range(p..p + j));
            delay.push(rng.random_range(0..=d_max));
        }
        Self { attr, next, delay }
    }
}

/// Array-of-structs execution view of a single judgment node, materialized by
/// [`Individual::copy_genes_to_nodes`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JudgeNode {
    pub attr: usize,
    pub next: usize,
    pub delay: usize,
}

/// A single GNP genome: `n_process_nodes` start nodes + `n_judgement_nodes`
/// judgment nodes.
#[derive(Debug, Clone)]
pub struct Individual {
    p: usize,
    start_next: Vec<usize>,
    genes: JudgeGenes,
    nodes: Vec<JudgeNode>,
}

impl Individual {
    pub fn init_random<R: Rng + ?Sized>(
        p: usize,
        j: usize,
        a: usize,
        d_max: usize,
        rng: &mut R,
    ) -> Self {
        let start_next: Vec<usize> = (0..p).map(|_| rng.random_range(p..p + j)).collect();
        let genes = JudgeGenes::init_random(j, a, p, d_max, rng);
        let mut ind = Self {
            p,
            start_next,
            genes,
            nodes: vec![JudgeNode::default(); j],
        };
        ind.copy_genes_to_nodes();
        ind
    }

    pub fn n_process_nodes(&self) -> usize {
        self.p
    }

    pub fn n_judgement_nodes(&self) -> usize {
        self.genes.attr.len()
    }

    /// Flatten the three parallel gene arrays into the `(attr, next, delay)`
    /// execution view. Must be called after any mutation to `genes` and
    /// before the kernel traverses this individual again.
    pub fn copy_genes_to_nodes(&mut self) {
        for k in 0..self.genes.attr.len() {
            self.nodes[k] = JudgeNode {
                attr: self.genes.attr[k],
                next: self.genes.next[k],
                delay: self.genes.delay[k],
            };
        }
    }

    #[inline]
    pub fn start_next(&self, k: usize) -> usize {
        self.start_next[k]
    }

    pub fn set_start_next(&mut self, k: usize, next: usize) {
        self.start_next[k] = next;
    }

    /// Judgment node view for global node id `id` (must be `>= p`).
    #[inline]
    pub fn judge_node(&self, id: usize) -> JudgeNode {
        self.nodes[id - self.p]
    }

    pub fn genes(&self) -> &JudgeGenes {
        &self.genes
    }

    pub fn genes_mut(&mut self) -> &mut JudgeGenes {
        &mut self.genes
    }

    /// Swap the `(attr, next, delay)` triple at judgment slot `slot` between
    /// `self` and `other` (§4.6's crossover operator).
    pub fn swap_judgement_gene(&mut self, other: &mut Individual, slot: usize) {
        std::mem::swap(&mut self.genes.attr[slot], &mut other.genes.attr[slot]);
        std::mem::swap(&mut self.genes.next[slot], &mut other.genes.next[slot]);
        std::mem::swap(&mut self.genes.delay[slot], &mut other.genes.delay[slot]);
    }
}

/// Fixed-size collection of `M` individuals. Roles (elite / clone cohorts)
/// are purely positional — see §3 and §4.6 — so `Population` is just a
/// `Vec<Individual>` with helpers for the size invariant.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    pub fn init_random<R: Rng + ?Sized>(
        m: usize,
        p: usize,
        j: usize,
        a: usize,
        d_max: usize,
        rng: &mut R,
    ) -> Self {
        let individuals = (0..m).map(|_| Individual::init_random(p, j, a, d_max, rng)).collect();
        Self { individuals }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn get(&self, i: usize) -> &Individual {
        &self.individuals[i]
    }

    pub fn get_mut(&mut self, i: usize) -> &mut Individual {
        &mut self.individuals[i]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.individuals.iter()
    }

    /// Split-borrow two distinct individuals mutably, needed by crossover.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> (&mut Individual, &mut Individual) {
        assert_ne!(a, b, "cannot pair an individual with itself");
        if a < b {
            let (left, right) = self.individuals.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.individuals.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }
}
