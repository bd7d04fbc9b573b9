use std::cell::OnceCell;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::gfx::Texture2D;

use super::decode::{DecodedImage, FileDecoder, ImageDecoder, TextureLoadError};

/// Identity of a load request. The same file loaded with and without a
/// vertical flip yields two different textures.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct LoadKey {
    pub path: PathBuf,
    pub flip_vertically: bool,
}

/// Handle returned by [`TextureLoader::request`]. Empty until the batch is
/// resolved, and stays empty if the load failed.
pub type PendingTexture<T = Texture2D> = Rc<OnceCell<T>>;

/// Outcome of one [`TextureLoader::resolve`] call.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ResolveReport {
    pub requested: usize,
    pub loaded: usize,
    pub failed: usize,
}

/// Deferred, batched texture loading.
///
/// Requests are cheap and only record the path. [`resolve`](Self::resolve)
/// decodes every distinct pending file in parallel, then uploads the results
/// one by one on the calling thread, which owns the device.
pub struct TextureLoader<T = Texture2D> {
    pending: Vec<(LoadKey, PendingTexture<T>)>,
    index: HashMap<LoadKey, usize>,
}

impl<T> Default for TextureLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TextureLoader<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Records a load of `path`. Requesting the same key again before the
    /// next resolve returns the same handle.
    pub fn request(&mut self, path: impl AsRef<Path>, flip_vertically: bool) -> PendingTexture<T> {
        let key = LoadKey {
            path: path.as_ref().to_path_buf(),
            flip_vertically,
        };
        if let Some(&i) = self.index.get(&key) {
            return Rc::clone(&self.pending[i].1);
        }

        let handle: PendingTexture<T> = Rc::new(OnceCell::new());
        self.index.insert(key.clone(), self.pending.len());
        self.pending.push((key, Rc::clone(&handle)));
        handle
    }

    /// Number of distinct loads waiting for [`resolve`](Self::resolve).
    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Decodes all pending loads with `decoder` on worker threads, then
    /// passes each successful decode to `upload` in request order and stores
    /// the result in its handle.
    ///
    /// Failed loads are logged and leave their handle empty; they do not
    /// affect other loads. The pending set is empty afterwards.
    pub fn resolve<D, U>(&mut self, decoder: &D, mut upload: U) -> ResolveReport
    where
        D: ImageDecoder + Sync,
        U: FnMut(&LoadKey, DecodedImage) -> T,
    {
        let pending = std::mem::take(&mut self.pending);
        self.index.clear();

        let mut report = ResolveReport {
            requested: pending.len(),
            ..ResolveReport::default()
        };
        if pending.is_empty() {
            return report;
        }

        let keys: Vec<&LoadKey> = pending.iter().map(|(key, _)| key).collect();
        let decoded = decode_parallel(decoder, &keys);

        for ((key, handle), result) in pending.into_iter().zip(decoded) {
            match result {
                Ok(image) => {
                    // Handles are fresh per resolve, so the cell is still empty.
                    let _ = handle.set(upload(&key, image));
                    report.loaded += 1;
                }
                Err(e) => {
                    log::warn!("TextureLoader: {e}");
                    report.failed += 1;
                }
            }
        }

        log::info!(
            "TextureLoader: resolved {} textures ({} failed)",
            report.loaded,
            report.failed
        );
        report
    }
}

impl TextureLoader<Texture2D> {
    /// Resolves pending loads from disk into device textures.
    pub fn load_pending(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> ResolveReport {
        self.resolve(&FileDecoder, |key, image| {
            Texture2D::from_image(device, queue, &key.path.display().to_string(), &image)
        })
    }
}

/// Decodes `keys` on at most one scoped worker per available core and
/// returns results in key order.
fn decode_parallel<D>(
    decoder: &D,
    keys: &[&LoadKey],
) -> Vec<Result<DecodedImage, TextureLoadError>>
where
    D: ImageDecoder + Sync,
{
    let workers = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    decode_with_workers(decoder, keys, workers)
}

/// Workers pull the next key index from a shared cursor. A key whose worker
/// panicked comes back as [`TextureLoadError::Worker`].
fn decode_with_workers<D>(
    decoder: &D,
    keys: &[&LoadKey],
    workers: usize,
) -> Vec<Result<DecodedImage, TextureLoadError>>
where
    D: ImageDecoder + Sync,
{
    let cursor = AtomicUsize::new(0);
    let slots: Vec<OnceLock<Result<DecodedImage, TextureLoadError>>> =
        keys.iter().map(|_| OnceLock::new()).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..workers.clamp(1, keys.len().max(1)))
            .map(|_| {
                scope.spawn(|| loop {
                    let i = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(key) = keys.get(i) else {
                        break;
                    };
                    let _ = slots[i].set(decoder.decode(&key.path, key.flip_vertically));
                })
            })
            .collect();

        for handle in handles {
            if handle.join().is_err() {
                log::error!("TextureLoader: decode worker panicked");
            }
        }
    });

    keys.iter()
        .zip(slots)
        .map(|(key, slot)| {
            slot.into_inner().unwrap_or_else(|| {
                Err(TextureLoadError::Worker {
                    path: key.path.clone(),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serves solid images sized from the file name; `missing*` paths fail.
    #[derive(Default)]
    struct FakeDecoder {
        calls: Mutex<Vec<LoadKey>>,
    }

    impl ImageDecoder for FakeDecoder {
        fn decode(&self, path: &Path, flip: bool) -> Result<DecodedImage, TextureLoadError> {
            self.calls.lock().unwrap().push(LoadKey {
                path: path.to_path_buf(),
                flip_vertically: flip,
            });
            let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            if name.starts_with("missing") {
                return Err(TextureLoadError::Io {
                    path: path.to_path_buf(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
            let side = name.len() as u32;
            Ok(DecodedImage::solid(side, side, [255; 4]))
        }
    }

    fn dims(_: &LoadKey, image: DecodedImage) -> (u32, u32) {
        (image.width, image.height)
    }

    #[test]
    fn same_key_returns_same_handle() {
        let mut loader = TextureLoader::<(u32, u32)>::new();
        let a = loader.request("a.png", true);
        let b = loader.request("a.png", true);
        let c = loader.request("a.png", false);
        assert!(Rc::ptr_eq(&a, &b));
        assert!(!Rc::ptr_eq(&a, &c));
        assert_eq!(loader.pending_len(), 2);
    }

    #[test]
    fn each_key_is_decoded_once() {
        let mut loader = TextureLoader::<(u32, u32)>::new();
        let handles: Vec<_> = (0..4).map(|_| loader.request("tile.png", true)).collect();
        loader.request("hero.png", true);

        let decoder = FakeDecoder::default();
        let report = loader.resolve(&decoder, dims);

        assert_eq!(decoder.calls.lock().unwrap().len(), 2);
        assert_eq!(report, ResolveReport { requested: 2, loaded: 2, failed: 0 });
        for h in &handles {
            assert_eq!(h.get(), Some(&(4, 4)));
        }
    }

    #[test]
    fn resolve_clears_pending_state() {
        let mut loader = TextureLoader::<(u32, u32)>::new();
        let first = loader.request("ab.png", false);
        loader.resolve(&FakeDecoder::default(), dims);
        assert_eq!(loader.pending_len(), 0);

        let second = loader.request("ab.png", false);
        assert!(!Rc::ptr_eq(&first, &second), "a new batch gets a new handle");
        assert!(second.get().is_none());

        let report = loader.resolve(&FakeDecoder::default(), dims);
        assert_eq!(report.loaded, 1);
        assert_eq!(second.get(), Some(&(2, 2)));
    }

    #[test]
    fn failed_load_does_not_affect_siblings() {
        let mut loader = TextureLoader::<(u32, u32)>::new();
        let ok1 = loader.request("one.png", true);
        let bad = loader.request("missing.png", true);
        let ok2 = loader.request("three.png", true);

        let report = loader.resolve(&FakeDecoder::default(), dims);

        assert_eq!(report, ResolveReport { requested: 3, loaded: 2, failed: 1 });
        assert_eq!(ok1.get(), Some(&(3, 3)));
        assert!(bad.get().is_none());
        assert_eq!(ok2.get(), Some(&(5, 5)));
    }

    #[test]
    fn uploads_run_in_request_order() {
        let mut loader = TextureLoader::<usize>::new();
        for name in ["c.png", "a.png", "b.png"] {
            loader.request(name, false);
        }
        let mut order = Vec::new();
        loader.resolve(&FakeDecoder::default(), |key, _| {
            order.push(key.path.clone());
            order.len()
        });
        assert_eq!(
            order,
            vec![PathBuf::from("c.png"), PathBuf::from("a.png"), PathBuf::from("b.png")]
        );
    }

    /// Records how many decodes overlap; `panic*` paths panic.
    #[derive(Default)]
    struct CountingDecoder {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ImageDecoder for CountingDecoder {
        fn decode(&self, path: &Path, _: bool) -> Result<DecodedImage, TextureLoadError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(2));
            self.active.fetch_sub(1, Ordering::SeqCst);

            let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            if name.starts_with("panic") {
                panic!("decoder failure for {name}");
            }
            let side = name.trim_start_matches('k').parse().unwrap_or(0);
            Ok(DecodedImage::solid(side, 1, [255; 4]))
        }
    }

    fn numbered_keys(n: u32) -> Vec<LoadKey> {
        (1..=n)
            .map(|i| LoadKey {
                path: PathBuf::from(format!("k{i}.png")),
                flip_vertically: false,
            })
            .collect()
    }

    #[test]
    fn decode_concurrency_is_bounded_by_worker_count() {
        let keys = numbered_keys(64);
        let refs: Vec<&LoadKey> = keys.iter().collect();
        let decoder = CountingDecoder::default();

        let results = decode_with_workers(&decoder, &refs, 3);

        let peak = decoder.peak.load(Ordering::SeqCst);
        assert!((1..=3).contains(&peak), "peak {peak}");
        let widths: Vec<u32> = results.into_iter().map(|r| r.unwrap().width).collect();
        assert_eq!(widths, (1..=64).collect::<Vec<_>>());
    }

    #[test]
    fn more_workers_than_keys_still_decodes_each_once() {
        let keys = numbered_keys(2);
        let refs: Vec<&LoadKey> = keys.iter().collect();
        let decoder = CountingDecoder::default();

        let results = decode_with_workers(&decoder, &refs, 16);

        assert!(decoder.peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(Result::is_ok));
    }

    #[test]
    fn panicking_decode_fails_only_its_key() {
        let keys: Vec<LoadKey> = ["k1.png", "panic.png", "k3.png"]
            .into_iter()
            .map(|p| LoadKey {
                path: PathBuf::from(p),
                flip_vertically: false,
            })
            .collect();
        let refs: Vec<&LoadKey> = keys.iter().collect();

        let results = decode_with_workers(&CountingDecoder::default(), &refs, 2);

        assert_eq!(results[0].as_ref().map(|i| i.width).ok(), Some(1));
        assert!(matches!(
            &results[1],
            Err(TextureLoadError::Worker { path }) if path.ends_with("panic.png")
        ));
        assert_eq!(results[2].as_ref().map(|i| i.width).ok(), Some(3));
    }

    #[test]
    fn empty_resolve_is_a_no_op() {
        let mut loader = TextureLoader::<(u32, u32)>::new();
        let decoder = FakeDecoder::default();
        assert_eq!(loader.resolve(&decoder, dims), ResolveReport::default());
        assert!(decoder.calls.lock().unwrap().is_empty());
    }
}
