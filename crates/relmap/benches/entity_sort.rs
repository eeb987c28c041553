use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use relmap::map::{JoinCondition, ToDependentPkSemantics, ToManySemantics};
use relmap::{Catalog, DataMap, DbEntity, EntitySorter, SorterConfig};
use std::sync::Arc;

/// `n` tables where each references its predecessor, plus every tenth table
/// referencing the first one, declared in reverse dependency order.
fn chain_catalog(n: usize) -> Arc<Catalog> {
    let mut map = DataMap::new("chain");
    for i in (0..n).rev() {
        map.add_db_entity(
            DbEntity::new(format!("T{i}"))
                .with_primary_key(&["ID"])
                .with_columns(&["PREV_ID", "ROOT_ID"]),
        );
    }
    for i in 1..n {
        let mut joins = vec![(format!("T{}", i - 1), "PREV_ID", "prev")];
        if i % 10 == 0 {
            joins.push(("T0".to_string(), "ROOT_ID", "root"));
        }
        for (target, column, name) in joins {
            let join = map
                .join_builder()
                .condition(JoinCondition::single(column, "ID"))
                .entities([format!("T{i}"), target])
                .names([Some(name.to_string()), None])
                .to_many_semantics(ToManySemantics::ManyToOne)
                .to_dep_pk_semantics(ToDependentPkSemantics::None)
                .build()
                .unwrap();
            map.add_join(join);
        }
    }
    Arc::new(Catalog::from_data_map(map).unwrap())
}

fn bench_reindex(c: &mut Criterion) {
    let mut group = c.benchmark_group("entity_sort/reindex");

    for n in [10, 100, 500] {
        let catalog = chain_catalog(n);
        let sorter = EntitySorter::with_catalog(catalog, SorterConfig::default());
        group.bench_with_input(BenchmarkId::from_parameter(n), &sorter, |b, sorter| {
            b.iter(|| black_box(sorter.reindex().unwrap()));
        });
    }

    group.finish();
}

fn bench_sort_entities(c: &mut Criterion) {
    let mut group = c.benchmark_group("entity_sort/sort_db_entities");

    for n in [10, 100, 500] {
        let catalog = chain_catalog(n);
        let sorter = EntitySorter::with_catalog(Arc::clone(&catalog), SorterConfig::default());
        sorter.reindex().unwrap();
        let entities: Vec<_> = catalog.db_entities().cloned().collect();

        group.bench_with_input(BenchmarkId::from_parameter(n), &entities, |b, entities| {
            b.iter(|| {
                let mut batch = entities.clone();
                sorter.sort_db_entities(&mut batch, false).unwrap();
                black_box(batch);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reindex, bench_sort_entities);
criterion_main!(benches);
