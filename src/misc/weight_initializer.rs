use tch::nn::Init;

/// Xavier Initialization
pub fn xavier_init(nin: i64, nout: i64) -> Init {
    let bound = (6.0 / (nin + nout) as f64).sqrt();
    Init::Uniform {
        lo: -bound,
        up: bound,
    }
}

/// He Initialization
pub fn he_init(nin: i64) -> Init {
    Init::Randn {
        mean: 0.0,
        stdev: (2.0 / nin as f64).sqrt(),
    }
}
