pub(crate) fn prime_factors(mut n: u64) -> Vec<u64> {
    let mut res = vec![];
    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            res.push(i);
            n /= i;
            while n % i == 0 {
                n /= i;
            }
        }
        i += 1;
    }
    if n > 1 {
        res.push(n);
    }
    res
}

pub(crate) fn modpow(a: u64, mut n: u64, p: u64) -> u64 {
    let p = p as u128;
    let mut a = a as u128 % p;
    let mut res = 1 % p;
    while n > 0 {
        if n % 2 == 1 {
            res = (res * a) % p;
        }
        a = (a * a) % p;
        n /= 2;
    }
    res as u64
}
