pub fn min_of_2<T: PartialOrd + Copy>(first: T, second: T) -> T {
    if first < second {
        first
    } else {
        second
    }
}

pub fn max_of_2<T: PartialOrd + Copy>(first: T, second: T) -> T {
    if first > second {
        first
    } else {
        second
    }
}

/// `value` held within `[lower, upper]`. A NaN value comes back as `upper`.
pub fn clamp_between<T: PartialOrd + Copy>(value: T, lower: T, upper: T) -> T {
    max_of_2(min_of_2(value, upper), lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(2., 4., 2.)]
    #[case(4., 2., 2.)]
    #[case(-1., -1., -1.)]
    fn should_take_smaller_float(#[case] first: f64, #[case] second: f64, #[case] expected: f64) {
        assert_eq!(min_of_2(first, second), expected);
    }

    #[rstest]
    fn should_take_larger_capacity() {
        assert_eq!(max_of_2(0.005, 0.01), 0.01);
        assert_eq!(max_of_2(14.2, 0.01), 14.2);
    }

    #[rstest]
    #[case(1.4, 1.)]
    #[case(-0.2, 0.)]
    #[case(0.35, 0.35)]
    fn should_clamp_load_ratio(#[case] ratio: f64, #[case] expected: f64) {
        assert_eq!(clamp_between(ratio, 0., 1.), expected);
    }

    #[rstest]
    fn should_clamp_nan_to_upper_bound() {
        assert_eq!(clamp_between(f64::NAN, 0., 1.), 1.);
    }
}
