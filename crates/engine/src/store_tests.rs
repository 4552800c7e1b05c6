// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::executor::SimEngine;
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

type Log<T> = Rc<RefCell<Vec<T>>>;

fn log<T>() -> Log<T> {
    Rc::new(RefCell::new(Vec::new()))
}

#[test]
fn items_come_out_in_put_order() {
    let engine = SimEngine::new();
    let store: Store<u32> = engine.store(None);
    let received = log();
    let (s, e) = (store.clone(), engine.clone());
    engine.schedule("producer", async move {
        for i in 0..5 {
            s.put(i).await;
            e.delay(1.0).await?;
        }
        Ok(())
    });
    let (s, r) = (store.clone(), Rc::clone(&received));
    engine.schedule("consumer", async move {
        for _ in 0..5 {
            let item = s.get().await;
            r.borrow_mut().push(item);
        }
        Ok(())
    });
    engine.run(None);
    assert_eq!(*received.borrow(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn bounded_put_blocks_until_space_frees() {
    let engine = SimEngine::new();
    let store: Store<&str> = engine.store(Some(1));
    let trace: Log<(&str, f64)> = log();
    let (s, e, t) = (store.clone(), engine.clone(), Rc::clone(&trace));
    engine.schedule("producer", async move {
        s.put("a").await;
        t.borrow_mut().push(("put-a", e.now()));
        s.put("b").await;
        t.borrow_mut().push(("put-b", e.now()));
        Ok(())
    });
    let (s, e, t) = (store.clone(), engine.clone(), Rc::clone(&trace));
    engine.schedule("consumer", async move {
        e.delay(5.0).await?;
        let item = s.get().await;
        t.borrow_mut().push((item, e.now()));
        Ok(())
    });
    engine.run(None);
    assert_eq!(
        *trace.borrow(),
        vec![("put-a", 0.0), ("a", 5.0), ("put-b", 5.0)]
    );
}

#[test]
fn get_blocks_until_an_item_arrives() {
    let engine = SimEngine::new();
    let store: Store<u8> = engine.store(None);
    let trace = log();
    let (s, e, t) = (store.clone(), engine.clone(), Rc::clone(&trace));
    engine.schedule("consumer", async move {
        let item = s.get().await;
        t.borrow_mut().push((item, e.now()));
        Ok(())
    });
    let (s, e) = (store.clone(), engine.clone());
    engine.schedule("producer", async move {
        e.delay(3.0).await?;
        s.put(7).await;
        Ok(())
    });
    engine.run(None);
    assert_eq!(*trace.borrow(), vec![(7, 3.0)]);
}

#[test]
fn try_get_is_non_blocking() {
    let engine = SimEngine::new();
    let store: Store<u8> = engine.store(None);
    assert_eq!(store.try_get(), None);
    let s = store.clone();
    engine.schedule("producer", async move {
        s.put(1).await;
        s.put(2).await;
        Ok(())
    });
    engine.run(None);
    assert_eq!(store.try_get(), Some(1));
    assert_eq!(store.try_get(), Some(2));
    assert_eq!(store.try_get(), None);
}

#[test]
fn items_snapshot_does_not_consume() {
    let engine = SimEngine::new();
    let store: Store<u8> = engine.store(None);
    let s = store.clone();
    engine.schedule("producer", async move {
        s.put(1).await;
        s.put(2).await;
        s.put(3).await;
        Ok(())
    });
    engine.run(None);
    assert_eq!(store.items(), vec![1, 2, 3]);
    assert_eq!(store.len(), 3);
}

#[test]
fn get_or_timeout_returns_none_on_timeout() {
    let engine = SimEngine::new();
    let store: Store<u8> = engine.store(None);
    let trace = log();
    let (s, e, t) = (store.clone(), engine.clone(), Rc::clone(&trace));
    engine.schedule("consumer", async move {
        let got = s.get_or_timeout(5.0).await;
        t.borrow_mut().push((got, e.now()));
        Ok(())
    });
    engine.run(None);
    assert_eq!(*trace.borrow(), vec![(None, 5.0)]);
}

#[test]
fn get_or_timeout_prefers_the_item() {
    let engine = SimEngine::new();
    let store: Store<u8> = engine.store(None);
    let trace = log();
    let (s, e, t) = (store.clone(), engine.clone(), Rc::clone(&trace));
    engine.schedule("consumer", async move {
        let got = s.get_or_timeout(5.0).await;
        t.borrow_mut().push((got, e.now()));
        Ok(())
    });
    let (s, e) = (store.clone(), engine.clone());
    engine.schedule("producer", async move {
        e.delay(2.0).await?;
        s.put(9).await;
        Ok(())
    });
    engine.run(None);
    assert_eq!(*trace.borrow(), vec![(Some(9), 2.0)]);
}

#[test]
fn timed_out_getter_leaves_the_queue_clean() {
    let engine = SimEngine::new();
    let store: Store<u8> = engine.store(None);
    let trace: Log<(&str, Option<u8>)> = log();
    let (s, t) = (store.clone(), Rc::clone(&trace));
    engine.schedule("impatient", async move {
        let got = s.get_or_timeout(1.0).await;
        t.borrow_mut().push(("impatient", got));
        Ok(())
    });
    let (s, t) = (store.clone(), Rc::clone(&trace));
    engine.schedule("patient", async move {
        let got = s.get().await;
        t.borrow_mut().push(("patient", Some(got)));
        Ok(())
    });
    let (s, e) = (store.clone(), engine.clone());
    engine.schedule("producer", async move {
        e.delay(3.0).await?;
        s.put(5).await;
        Ok(())
    });
    engine.run(None);
    assert_eq!(
        *trace.borrow(),
        vec![("impatient", None), ("patient", Some(5))]
    );
}

#[test]
fn blocked_getters_are_served_fifo() {
    let engine = SimEngine::new();
    let store: Store<u8> = engine.store(None);
    let trace: Log<(&str, u8)> = log();
    for name in ["g1", "g2"] {
        let (s, t) = (store.clone(), Rc::clone(&trace));
        engine.schedule(name, async move {
            let item = s.get().await;
            t.borrow_mut().push((name, item));
            Ok(())
        });
    }
    let (s, e) = (store.clone(), engine.clone());
    engine.schedule("producer", async move {
        e.delay(1.0).await?;
        s.put(10).await;
        e.delay(1.0).await?;
        s.put(20).await;
        Ok(())
    });
    engine.run(None);
    assert_eq!(*trace.borrow(), vec![("g1", 10), ("g2", 20)]);
}

#[test]
fn blocked_putters_are_served_fifo() {
    let engine = SimEngine::new();
    let store: Store<&str> = engine.store(Some(1));
    let s = store.clone();
    engine.schedule("fill", async move {
        s.put("seed").await;
        Ok(())
    });
    for name in ["p1", "p2"] {
        let s = store.clone();
        engine.schedule(name, async move {
            s.put(name).await;
            Ok(())
        });
    }
    let received = log();
    let (s, e, r) = (store.clone(), engine.clone(), Rc::clone(&received));
    engine.schedule("drain", async move {
        e.delay(1.0).await?;
        for _ in 0..3 {
            let item = s.get().await;
            r.borrow_mut().push(item);
        }
        Ok(())
    });
    engine.run(None);
    assert_eq!(*received.borrow(), vec!["seed", "p1", "p2"]);
}

proptest! {
    /// FIFO holds for any item sequence and any capacity.
    #[test]
    fn store_preserves_order(items in prop::collection::vec(0u32..1000, 0..40), cap in 1usize..8) {
        let engine = SimEngine::new();
        let store: Store<u32> = engine.store(Some(cap));
        let received = log();
        let (s, sent) = (store.clone(), items.clone());
        engine.schedule("producer", async move {
            for item in sent {
                s.put(item).await;
            }
            Ok(())
        });
        let n = items.len();
        let (s, r) = (store.clone(), Rc::clone(&received));
        engine.schedule("consumer", async move {
            for _ in 0..n {
                let item = s.get().await;
                r.borrow_mut().push(item);
            }
            Ok(())
        });
        let outcome = engine.run(None);
        prop_assert!(outcome.faults.is_empty());
        prop_assert_eq!(&*received.borrow(), &items);
    }
}
