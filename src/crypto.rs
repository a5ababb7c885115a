use super::*;

/// Side inputs some proof-of-work functions fold into the digest
/// (time-variant algorithms hash the timestamp, a few read coin
/// parameters). The common algorithms ignore everything here.
#[derive(Clone, Copy, Default)]
pub struct HashContext<'a> {
    pub ntime: Option<u32>,
    pub template: Option<&'a BlockTemplate>,
    pub coin: Option<&'a CoinTemplate>,
}

/// Capability mapping arbitrary input to a 32-byte digest. Implementations
/// are total: they always fill `output`.
pub trait HashAlgorithm: Send + Sync {
    fn digest(&self, input: &[u8], output: &mut [u8; 32], context: &HashContext);
}

struct Sha256d;

impl HashAlgorithm for Sha256d {
    fn digest(&self, input: &[u8], output: &mut [u8; 32], _context: &HashContext) {
        output.copy_from_slice(sha256d::Hash::hash(input).as_byte_array());
    }
}

/// Double SHA-256 with the digest flipped into display order, the form
/// block hashes are reported and submitted in.
struct Sha256dReverse;

impl HashAlgorithm for Sha256dReverse {
    fn digest(&self, input: &[u8], output: &mut [u8; 32], _context: &HashContext) {
        output.copy_from_slice(sha256d::Hash::hash(input).as_byte_array());
        output.reverse();
    }
}

struct Sha256Single;

impl HashAlgorithm for Sha256Single {
    fn digest(&self, input: &[u8], output: &mut [u8; 32], _context: &HashContext) {
        output.copy_from_slice(sha256::Hash::hash(input).as_byte_array());
    }
}

static REGISTRY: LazyLock<RwLock<HashMap<String, Arc<dyn HashAlgorithm>>>> =
    LazyLock::new(|| {
        let mut algorithms: HashMap<String, Arc<dyn HashAlgorithm>> = HashMap::new();
        algorithms.insert("sha256d".into(), Arc::new(Sha256d));
        algorithms.insert("sha256d-reverse".into(), Arc::new(Sha256dReverse));
        algorithms.insert("sha256".into(), Arc::new(Sha256Single));
        RwLock::new(algorithms)
    });

/// Register a hash capability under a name coin templates can refer to.
/// Meant for process start, before any job is built.
pub fn register(name: impl Into<String>, algorithm: Arc<dyn HashAlgorithm>) {
    REGISTRY
        .write()
        .expect("hash registry lock poisoned")
        .insert(name.into(), algorithm);
}

pub fn algorithm(name: &str) -> Result<Arc<dyn HashAlgorithm>> {
    REGISTRY
        .read()
        .expect("hash registry lock poisoned")
        .get(name)
        .cloned()
        .with_context(|| format!("unknown hash algorithm '{name}'"))
}
