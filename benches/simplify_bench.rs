//! Union simplification and join benchmarks.
//!
//! Measures redundancy removal over unions of growing width drawn from a
//! deep class hierarchy, and joins of sibling classes.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use gts::solver::{
    BuiltinTypes, DefinitionInfo, DefinitionStore, Environment, NullSink, TypeDb, TypeHierarchy,
    TypeId, TypeInterner, TypeJoiner, TypeSimplifier,
};

struct Fixture {
    types: TypeInterner,
    defs: DefinitionStore,
    builtins: BuiltinTypes,
}

impl Fixture {
    fn new() -> Self {
        let types = TypeInterner::new();
        let defs = DefinitionStore::new();
        let builtins = BuiltinTypes::install(&types, &defs);
        Self {
            types,
            defs,
            builtins,
        }
    }

    fn db(&self) -> TypeDb<'_> {
        TypeDb::new(&self.types, &self.defs, &self.builtins)
    }

    /// `C0`, `C1 extends C0`, ... `C{depth-1}`, returned root first.
    fn chain(&self, depth: usize) -> Vec<TypeId> {
        let mut out = Vec::with_capacity(depth);
        let mut parent: Option<TypeId> = None;
        for i in 0..depth {
            let mut info = DefinitionInfo::class(self.types.intern_string(&format!("C{i}")));
            if let Some(parent) = parent {
                info = info.with_extends(parent);
            }
            let ty = self.types.nominal_simple(self.defs.register(info));
            out.push(ty);
            parent = Some(ty);
        }
        out
    }

    /// `root` plus `width` direct subclasses of it.
    fn siblings(&self, width: usize) -> Vec<TypeId> {
        let root_def = self
            .defs
            .register(DefinitionInfo::class(self.types.intern_string("Root")));
        let root = self.types.nominal_simple(root_def);
        (0..width)
            .map(|i| {
                let name = self.types.intern_string(&format!("S{i}"));
                let def = self
                    .defs
                    .register(DefinitionInfo::class(name).with_extends(root));
                self.types.nominal_simple(def)
            })
            .collect()
    }
}

fn bench_union_simplification(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplify_union");
    for width in [4usize, 16, 64] {
        let fixture = Fixture::new();
        let chain = fixture.chain(width);
        let union = fixture.types.union_unsimplified(chain.iter().rev().copied().collect());
        let oracle = TypeHierarchy::new(fixture.db());
        let simplifier = TypeSimplifier::new(fixture.db(), &oracle);
        let env = Environment::new();
        group.bench_with_input(BenchmarkId::new("chain", width), &union, |b, &union| {
            b.iter(|| simplifier.simplify(&env, black_box(union), &mut NullSink));
        });
    }
    group.finish();
}

fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("join");
    for width in [2usize, 8, 32] {
        let fixture = Fixture::new();
        let siblings = fixture.siblings(width);
        let oracle = TypeHierarchy::new(fixture.db());
        let simplifier = TypeSimplifier::new(fixture.db(), &oracle);
        let env = Environment::new();
        group.bench_with_input(BenchmarkId::new("siblings", width), &siblings, |b, siblings| {
            b.iter(|| TypeJoiner::new(simplifier).join(&env, black_box(siblings), &mut NullSink));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_union_simplification, bench_join);
criterion_main!(benches);
