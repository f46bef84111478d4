//! Basic usage of `SlotPool`: stable ids, pinning accessors, deferred
//! reclamation.

use slot_pool::SlotPool;

fn main() {
    let pool = SlotPool::new();

    let first = pool.add("alpha".to_owned());
    let second = pool.add("beta".to_owned());

    println!("pool holds {} elements", pool.len());

    // Pin the first element, then remove it.
    let accessor = pool.get(first).unwrap();
    pool.remove(first);

    println!("after remove: resolvable = {}", pool.get(first).is_some());
    println!("but the pinned storage still reads: {}", *accessor);

    // Dropping the accessor completes the reclamation; the id is recycled.
    drop(accessor);
    let recycled = pool.add("gamma".to_owned());
    assert_eq!(recycled, first);

    println!("id was recycled for: {}", *pool.get(recycled).unwrap());

    pool.remove(second);
    pool.remove(recycled);
}
